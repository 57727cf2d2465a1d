use crate::domain::card::Card;

use super::hand_rank::HandType;

/// Порог "đủ tuổi": с меньшей обычной рукой нельзя выиграть.
pub const MIN_STANDING_VALUE: u32 = 16;

/// Очки руки.
///
/// Тузы считаются по позиции и по *итоговому* размеру руки:
///   - туз среди первых двух карт: 11 при 2 картах, 10 при 3 картах
///     ("гибкий", может стать 1), 1 при 4+ картах;
///   - туз с третьей карты и дальше: всегда 1.
/// Пока сумма > 21 и есть гибкий туз: он превращается из 10 в 1.
pub fn calculate_value(cards: &[Card]) -> u32 {
    let count = cards.len();
    let mut total: u32 = 0;
    let mut flexible_aces = 0u32;

    for (idx, card) in cards.iter().enumerate() {
        if !card.is_ace() {
            total += card.base_value();
            continue;
        }

        if idx >= 2 {
            total += 1;
            continue;
        }

        match count {
            2 => total += 11,
            3 => {
                total += 10;
                flexible_aces += 1;
            }
            _ => total += 1,
        }
    }

    while total > 21 && flexible_aces > 0 {
        total -= 9;
        flexible_aces -= 1;
    }

    total
}

/// Очки и тип руки. Порядок проверок важен:
/// Xì Bàn → Xì Dách → Ngũ Linh → перебор → обычная.
pub fn determine_hand_type(cards: &[Card]) -> (u32, HandType) {
    let value = calculate_value(cards);

    if cards.len() == 2 {
        if cards.iter().all(|c| c.is_ace()) {
            return (value, HandType::XiBan);
        }

        if value == 21
            && cards.iter().any(|c| c.is_ace())
            && cards.iter().any(|c| c.is_ten_value())
        {
            return (value, HandType::XiDach);
        }
    }

    if cards.len() == 5 && value <= 21 {
        return (value, HandType::NguLinh);
    }

    if value > 21 {
        return (value, HandType::Bust);
    }

    (value, HandType::Normal)
}

/// Можно ли спокойно остановиться: особая рука или 16+.
/// Остановиться можно и раньше, но такая рука всегда проигрывает.
pub fn can_stand_safely(cards: &[Card]) -> bool {
    let (value, hand_type) = determine_hand_type(cards);
    if hand_type.is_special() {
        return true;
    }
    hand_type == HandType::Normal && value >= MIN_STANDING_VALUE
}
