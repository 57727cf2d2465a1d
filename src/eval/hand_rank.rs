use serde::{Deserialize, Serialize};

/// Тип руки Xì Dách.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HandType {
    /// Два туза ровно на двух картах. Старшая рука.
    XiBan,
    /// Туз + десятка на двух картах (21).
    XiDach,
    /// Пять карт, сумма ≤ 21.
    NguLinh,
    /// Больше 21.
    Bust,
    Normal,
}

impl HandType {
    pub fn is_special(&self) -> bool {
        matches!(self, HandType::XiBan | HandType::XiDach | HandType::NguLinh)
    }
}

/// Человеческое описание типа руки (как его показывает бот).
pub fn describe_hand(hand_type: HandType) -> &'static str {
    match hand_type {
        HandType::XiBan => "Xì Bàn",
        HandType::XiDach => "Xì Dách",
        HandType::NguLinh => "Ngũ Linh",
        HandType::Bust => "Quắc",
        HandType::Normal => "",
    }
}
