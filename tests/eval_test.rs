//! Подсчёт очков, типы рук и сравнение с дилером.

use xidach_engine::domain::{Card, Rank, Suit};
use xidach_engine::engine::{dealer_decision, DealerDecision};
use xidach_engine::eval::*;

fn cards(s: &str) -> Vec<Card> {
    s.split_whitespace().map(|c| c.parse().unwrap()).collect()
}

fn ten_values() -> Vec<Rank> {
    vec![Rank::Ten, Rank::Jack, Rank::Queen, Rank::King]
}

/// Туз + десятка в любом порядке и любых мастях: 21 и Xì Dách.
#[test]
fn ace_and_ten_is_xi_dach() {
    for ten in ten_values() {
        for s1 in Suit::ALL {
            for s2 in Suit::ALL {
                let ace = Card::new(Rank::Ace, s1);
                let t = Card::new(ten, s2);
                for hand in [vec![ace, t], vec![t, ace]] {
                    assert_eq!(calculate_value(&hand), 21);
                    assert_eq!(determine_hand_type(&hand), (21, HandType::XiDach));
                }
            }
        }
    }
}

/// Два туза: всегда Xì Bàn, какие бы очки ни получились.
#[test]
fn two_aces_is_xi_ban() {
    for s1 in Suit::ALL {
        for s2 in Suit::ALL {
            let hand = vec![Card::new(Rank::Ace, s1), Card::new(Rank::Ace, s2)];
            assert_eq!(determine_hand_type(&hand).1, HandType::XiBan);
        }
    }
}

#[test]
fn five_cards_under_limit_is_ngu_linh() {
    let hands = ["2s 3h 4c 5d 6s", "As 2h 3c 4d 5s", "10s 2h 3c 2d 4s", "As Ah 2c 3d 4s"];
    for h in hands {
        let hand = cards(h);
        let (value, ty) = determine_hand_type(&hand);
        assert!(value <= 21, "{h} = {value}");
        assert_eq!(ty, HandType::NguLinh, "{h}");
    }

    let busted = cards("10s 5h 4c 2d 3s");
    assert_eq!(determine_hand_type(&busted), (24, HandType::Bust));
}

/// Туз из первых двух карт считается по итоговому размеру руки.
#[test]
fn flexible_ace_quirk() {
    // 3 карты: туз = 10, при переборе становится 1.
    assert_eq!(calculate_value(&cards("As 5h 3c")), 18);
    assert_eq!(calculate_value(&cards("As 9h 5c")), 15);
    // 4+ карты: туз из первых двух = 1.
    assert_eq!(calculate_value(&cards("As 5h 3c 2d")), 11);
    // Туз с третьей позиции: всегда 1.
    assert_eq!(calculate_value(&cards("5s 5h As")), 11);
    // Два туза в трёх картах: оба по 10, один становится 1.
    assert_eq!(calculate_value(&cards("As Ah 5c")), 16);
}

#[test]
fn stand_safety_hint() {
    assert!(!can_stand_safely(&cards("5s 6h")));
    assert!(can_stand_safely(&cards("10s 6h")));
    assert!(can_stand_safely(&cards("As Kh")));
    assert!(can_stand_safely(&cards("2s 3h 4c 2d 3s")));
    assert!(!can_stand_safely(&cards("10s 6h 9c")));
}

/// Antisymmetry: при обмене ролей выигрыш ↔ проигрыш, ничья остаётся ничьей.
/// Правило "меньше 16: проигрыш" ломает симметрию, поэтому
/// берём только руки, которым можно стоять, и без перебора.
#[test]
fn compare_is_antisymmetric() {
    let hands = [
        "10s 6h",
        "10s 7h",
        "10s 9h",
        "Ks Qh",
        "As Kh",
        "As Ah",
        "2s 3h 4c 2d 3s",
        "10s 5h 2c 3d",
        "7s 7h 7c",
        "As 9h",
    ];
    for a in hands {
        for b in hands {
            let a_cards = cards(a);
            let b_cards = cards(b);
            let ab = compare(&a_cards, &b_cards);
            let ba = compare(&b_cards, &a_cards);
            match ab.outcome {
                Outcome::Win => assert_eq!(ba.outcome, Outcome::Lose, "{a} vs {b}"),
                Outcome::Lose => assert_eq!(ba.outcome, Outcome::Win, "{a} vs {b}"),
                Outcome::Push => assert_eq!(ba.outcome, Outcome::Push, "{a} vs {b}"),
            }
        }
    }
}

#[test]
fn hierarchy_xi_ban_ngu_linh_xi_dach_value() {
    let xi_ban = cards("As Ah");
    let ngu_linh = cards("2s 3h 4c 2d 3s");
    let xi_dach = cards("As Kh");
    let twenty_one = cards("10s 5h 6c");

    assert_eq!(compare(&xi_ban, &ngu_linh), Comparison::win(4));
    assert_eq!(compare(&ngu_linh, &xi_dach), Comparison::win(2));
    assert_eq!(compare(&xi_dach, &twenty_one), Comparison::win(3));
    assert_eq!(compare(&twenty_one, &xi_dach), Comparison::LOSE);
    assert_eq!(compare(&xi_dach, &xi_dach), Comparison::PUSH);
    assert_eq!(compare(&xi_ban, &xi_ban), Comparison::PUSH);
}

/// Ngũ Linh против Ngũ Linh: по очкам, меньшая рука проигрывает.
#[test]
fn ngu_linh_vs_ngu_linh_by_value() {
    let low = cards("2s 3h 4c 2d 3s");
    let high = cards("2s 3h 4c 5d 6s");
    assert_eq!(compare(&high, &low), Comparison::win(2));
    assert_eq!(compare(&low, &high), Comparison::LOSE);
}

#[test]
fn player_bust_loses_even_if_dealer_busts() {
    let bust = cards("10s 6h 9c");
    let dealer_bust = cards("10d 6c 8h");
    assert_eq!(compare(&bust, &dealer_bust), Comparison::LOSE);
    assert_eq!(compare(&cards("10s 7h"), &dealer_bust), Comparison::win(2));
}

/// [A, K] против дилера [7, 9].
#[test]
fn xi_dach_beats_dealer_sixteen_and_twenty_one() {
    let player = cards("Ad Kd");
    assert_eq!(determine_hand_type(&player), (21, HandType::XiDach));

    let dealer = cards("7s 9h");
    assert_eq!(calculate_value(&dealer), 16);
    assert_eq!(dealer_decision(&dealer).0, DealerDecision::Stand);
    assert_eq!(compare(&player, &dealer), Comparison::win(3));

    // Дилер, дотянувший до 21 обычной рукой, тоже проигрывает Xì Dách.
    let dealer_21 = cards("7s 9h 5c");
    assert_eq!(calculate_value(&dealer_21), 21);
    assert_eq!(dealer_decision(&dealer_21).0, DealerDecision::Stand);
    assert_eq!(compare(&player, &dealer_21), Comparison::win(3));
}

/// Встал на 11: проигрыш при любой руке дилера.
#[test]
fn standing_under_sixteen_always_loses() {
    let player = cards("5s 6h");
    for dealer in ["10s 6h 9c", "10s 7h", "2s 3h 4c 2d 3s", "As Ah"] {
        assert_eq!(compare(&player, &cards(dealer)), Comparison::LOSE, "{dealer}");
    }
}

/// Дилер берёт ниже 16, стоит на 16 и выше, на пяти картах.
#[test]
fn dealer_policy_thresholds() {
    assert_eq!(dealer_decision(&cards("10s 5h")).0, DealerDecision::Hit);
    assert_eq!(dealer_decision(&cards("10s 6h")).0, DealerDecision::Stand);
    assert_eq!(dealer_decision(&cards("10s 9h")).0, DealerDecision::Stand);
    assert_eq!(dealer_decision(&cards("2s 2h 2c 2d 3s")).0, DealerDecision::Stand);
    assert_eq!(dealer_decision(&cards("2s 2h 2c 2d")).0, DealerDecision::Hit);
}

#[test]
fn hand_names() {
    assert_eq!(describe_hand(HandType::XiBan), "Xì Bàn");
    assert_eq!(describe_hand(HandType::XiDach), "Xì Dách");
    assert_eq!(describe_hand(HandType::NguLinh), "Ngũ Linh");
}
