//! Интеграционные тесты для доменной модели (crate::domain).

use std::collections::HashSet;

use xidach_engine::domain::*;
use xidach_engine::infra::rng::DeterministicRng;

fn cards(s: &str) -> Vec<Card> {
    s.split_whitespace().map(|c| c.parse().unwrap()).collect()
}

/// Колода: 52 уникальные карты, 4 масти по 13.
#[test]
fn standard_deck_is_complete() {
    let deck = Deck::standard_52();
    assert_eq!(deck.len(), 52);

    let unique: HashSet<Card> = deck.cards.iter().copied().collect();
    assert_eq!(unique.len(), 52);

    for suit in Suit::ALL {
        assert_eq!(deck.cards.iter().filter(|c| c.suit == suit).count(), 13);
    }
}

/// draw(0) ничего не меняет.
#[test]
fn draw_zero_keeps_deck() {
    let mut rng = DeterministicRng::from_seed(1);
    let mut deck = Deck::shuffled(&mut rng);
    let before = deck.clone();

    assert!(deck.draw(0, &mut rng).is_empty());
    assert_eq!(deck, before);
}

/// Вытянуть всю колоду, потом ещё одну: ровно одна пересборка до 52.
#[test]
fn drawing_past_the_end_reshuffles_once() {
    let mut rng = DeterministicRng::from_seed(2);
    let mut deck = Deck::shuffled(&mut rng);

    let all = deck.draw(52, &mut rng);
    assert_eq!(all.len(), 52);
    assert!(deck.is_empty());
    assert_eq!(deck.reshuffles, 0);

    let one = deck.draw(1, &mut rng);
    assert_eq!(one.len(), 1);
    assert_eq!(deck.reshuffles, 1);
    assert_eq!(deck.len(), 51);
}

/// Если просят больше, чем осталось: колода пересобирается целиком.
#[test]
fn short_deck_is_rebuilt_before_draw() {
    let mut rng = DeterministicRng::from_seed(3);
    let mut deck = Deck::stacked(cards("As Kh"));

    let drawn = deck.draw(3, &mut rng);
    assert_eq!(drawn.len(), 3);
    assert_eq!(deck.reshuffles, 1);
    assert_eq!(deck.len(), 49);
}

/// Больше 52 за раз: к пересборке докладываются свежие колоды.
#[test]
fn oversized_draw_appends_fresh_decks() {
    let mut rng = DeterministicRng::from_seed(6);
    let mut deck = Deck::standard_52();

    let drawn = deck.draw(53, &mut rng);
    assert_eq!(drawn.len(), 53);
    assert_eq!(deck.reshuffles, 2);
    assert_eq!(deck.len(), 51);

    let mut empty = Deck::stacked(Vec::new());
    let drawn = empty.draw(120, &mut rng);
    assert_eq!(drawn.len(), 120);
    assert_eq!(empty.reshuffles, 3);
    assert_eq!(empty.len(), 36);
}

#[test]
fn stacked_deck_deals_from_the_top() {
    let mut rng = DeterministicRng::from_seed(4);
    let mut deck = Deck::stacked(cards("As Kh 7c"));

    assert_eq!(deck.draw_one(&mut rng), "As".parse().unwrap());
    assert_eq!(deck.draw(2, &mut rng), cards("Kh 7c"));
    assert!(deck.is_empty());

    // Пустая колода тоже не ошибка.
    let _ = deck.draw_one(&mut rng);
    assert_eq!(deck.reshuffles, 1);
    assert_eq!(deck.len(), 51);
}

#[test]
fn card_display_and_parse() {
    let c: Card = "10h".parse().unwrap();
    assert_eq!(c, Card::new(Rank::Ten, Suit::Hearts));
    assert_eq!(c.to_string(), "10♥");
    assert_eq!("Td".parse::<Card>().unwrap().rank, Rank::Ten);
    assert!("1x".parse::<Card>().is_err());
    assert!("".parse::<Card>().is_err());
}

#[test]
fn chips_arithmetic_saturates() {
    assert_eq!(Chips(5) - Chips(10), Chips::ZERO);
    assert_eq!(Chips(5).times(3), Chips(15));
    assert_eq!(Chips(u64::MAX) + Chips(1), Chips(u64::MAX));

    let mut c = Chips(10);
    c -= Chips(4);
    c += Chips(1);
    assert_eq!(c, Chips(7));
}

/// Перебор: Bust, пятая карта без перебора: Stand.
#[test]
fn player_take_card_transitions() {
    let mut p = Player::staked(0, 1, "a".into(), Chips(10));
    p.hand = cards("10s 6h");
    p.status = PlayerStatus::Playing;
    p.take_card("9c".parse().unwrap());
    assert_eq!(p.status, PlayerStatus::Bust);

    let mut q = Player::staked(1, 2, "b".into(), Chips(10));
    q.hand = cards("2s 3h 2c 3d");
    q.status = PlayerStatus::Playing;
    q.take_card("4c".parse().unwrap());
    assert_eq!(q.status, PlayerStatus::Stand);
    assert_eq!(q.hand.len(), 5);
}

/// Два туза дают 22 очка, но это Xì Bàn, а не перебор.
#[test]
fn xi_ban_is_not_bust() {
    let mut p = Player::staked(0, 1, "a".into(), Chips(10));
    p.hand = cards("As Ah");
    assert_eq!(p.hand_value(), 22);
    assert!(!p.is_bust());

    p.hand = cards("10s 6h 9c");
    assert!(p.is_bust());
}

#[test]
fn new_player_is_spectating_until_staked() {
    let p = Player::new(0, 1, "a".into());
    assert_eq!(p.status, PlayerStatus::Spectating);
    assert!(!p.is_in_round());

    let s = Player::staked(0, 1, "a".into(), Chips(3));
    assert_eq!(s.status, PlayerStatus::Waiting);
    assert!(s.is_in_round());
}

#[test]
fn table_starts_by_kind() {
    let solo = Table::new(1, 1, 1, TableKind::Solo, 1, DeterministicRng::from_seed(1));
    assert_eq!(solo.status, TableStatus::Playing);
    assert_eq!(solo.seats.len(), 1);

    let multi = Table::new(2, 1, 1, TableKind::Multi, 8, DeterministicRng::from_seed(1));
    assert_eq!(multi.status, TableStatus::Lobby);
    assert_eq!(multi.deck.len(), 52);
    assert_eq!(multi.first_free_seat(), Some(0));
    assert_eq!(multi.current_seat(), None);
}

#[test]
fn table_status_order_follows_lifecycle() {
    assert!(TableStatus::Lobby < TableStatus::Betting);
    assert!(TableStatus::Betting < TableStatus::Playing);
    assert!(TableStatus::Playing < TableStatus::DealerTurn);
    assert!(TableStatus::DealerTurn < TableStatus::Finished);
}
