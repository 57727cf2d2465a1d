//! Переходы состояния одного стола. Всё здесь синхронно и работает
//! над `&mut Table`: вызывающий код держит замок стола, делает
//! мутацию и отпускает замок до любого рендера.

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::player::{Player, PlayerStatus};
use crate::domain::table::{Table, TableKind, TableStatus};
use crate::domain::{SeatIndex, UserId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::dealer::{dealer_decision, DealerDecision, DealerReason};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::HandEventKind;
use crate::engine::validation::{ensure_pre_deal, validate_action, validate_stake};
use crate::engine::RandomSource;
use crate::eval::{calculate_value, compare, determine_hand_type, HandType, Outcome};

/// Что дальше после мутации фазы ходов.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnState {
    /// Ход игрока на месте `seat`. `turn_index`: позиция в turn_order,
    /// по ней таймер понимает, что ход уже сменился.
    Turn {
        seat: SeatIndex,
        turn_index: usize,
        user_id: UserId,
    },
    /// Все игроки закончили, ход дилера.
    DealerTurn,
}

/// Результат применения действия игрока.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub seat: SeatIndex,
    pub kind: PlayerActionKind,
    pub card: Option<Card>,
    pub status_after: PlayerStatus,
    pub next: TurnState,
}

/// Результат закрытия приёма ставок.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BettingClosed {
    /// Ни одной списанной ставки: стол закрыт.
    Cancelled { dropped: Vec<UserId> },
    /// Карты розданы.
    Dealt {
        dropped: Vec<UserId>,
        first: TurnState,
    },
}

/// Один шаг дилера.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DealerStep {
    Drew { card: Card, value_after: u32 },
    Stood { value: u32, reason: DealerReason },
}

/// Расчёт одного места. Только математика: зачисление делает контроллер.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatSettlement {
    pub seat: SeatIndex,
    pub user_id: UserId,
    pub display_name: String,
    pub stake: Chips,
    pub hand: Vec<Card>,
    pub value: u32,
    pub hand_type: HandType,
    pub outcome: Outcome,
    pub multiplier: u64,
    pub payout: Chips,
    pub busted: bool,
}

/// Посадить игрока за мультистол (только в лобби).
pub fn seat_player(
    table: &mut Table,
    user_id: UserId,
    display_name: String,
) -> Result<SeatIndex, EngineError> {
    if table.status != TableStatus::Lobby {
        return Err(EngineError::WrongStatus(table.status));
    }
    if table.seat_of(user_id).is_some() {
        return Err(EngineError::AlreadySeated(user_id));
    }
    let seat = table.first_free_seat().ok_or(EngineError::TableFull)?;

    table.seats[seat as usize] = Some(Player::new(seat, user_id, display_name));
    table
        .history
        .push(HandEventKind::PlayerSeated { seat, user_id });
    Ok(seat)
}

/// Посадить игрока соло-стола. Ставка к этому моменту уже списана.
pub fn seat_staked_player(
    table: &mut Table,
    user_id: UserId,
    display_name: String,
    stake: Chips,
) -> Result<SeatIndex, EngineError> {
    if table.kind != TableKind::Solo || !table.dealer_hand.is_empty() {
        return Err(EngineError::WrongStatus(table.status));
    }
    if table.seat_of(user_id).is_some() {
        return Err(EngineError::AlreadySeated(user_id));
    }
    let seat = table.first_free_seat().ok_or(EngineError::TableFull)?;

    table.seats[seat as usize] = Some(Player::staked(seat, user_id, display_name, stake));
    table
        .history
        .push(HandEventKind::PlayerSeated { seat, user_id });
    table.history.push(HandEventKind::StakeLocked {
        seat,
        user_id,
        stake,
    });
    Ok(seat)
}

/// Убрать игрока до раздачи. Возвращает игрока; если его ставка
/// была списана, её возвращает вызывающий код.
pub fn remove_player(table: &mut Table, user_id: UserId) -> Result<Player, EngineError> {
    ensure_pre_deal(table)?;
    let seat = table
        .seat_of(user_id)
        .ok_or(EngineError::PlayerNotAtTable(user_id))?;

    let player = table.seats[seat as usize]
        .take()
        .ok_or(EngineError::Internal("seat_of returned an empty seat"))?;

    let refunded = if player.is_in_round() {
        player.stake
    } else {
        Chips::ZERO
    };
    table.history.push(HandEventKind::PlayerLeft {
        seat,
        user_id,
        refunded,
    });
    Ok(player)
}

/// Лобби → приём ставок.
pub fn open_betting(table: &mut Table) -> Result<bool, EngineError> {
    if table.status != TableStatus::Lobby {
        return Err(EngineError::WrongStatus(table.status));
    }
    table.status = TableStatus::Betting;
    table.history.push(HandEventKind::BettingOpened);
    Ok(table.seated_count() > 0 && table.ready_count() == table.seated_count())
}

/// Выбрать (или заменить) ставку. Баланс не трогает.
pub fn select_stake(
    table: &mut Table,
    user_id: UserId,
    amount: Chips,
    min_bet: Chips,
) -> Result<(), EngineError> {
    ensure_pre_deal(table)?;
    validate_stake(amount, min_bet)?;

    let seat = table
        .seat_of(user_id)
        .ok_or(EngineError::PlayerNotAtTable(user_id))?;
    let player = table
        .player_mut(seat)
        .ok_or(EngineError::Internal("seat_of returned an empty seat"))?;

    if player.is_ready {
        return Err(EngineError::AlreadyReady(user_id));
    }
    player.selected_stake = amount;
    Ok(())
}

/// Проверка перед списанием: можно ли подтвердить ставку.
/// Возвращает место и сумму к списанию.
pub fn prepare_ready(table: &Table, user_id: UserId) -> Result<(SeatIndex, Chips), EngineError> {
    ensure_pre_deal(table)?;
    let seat = table
        .seat_of(user_id)
        .ok_or(EngineError::PlayerNotAtTable(user_id))?;
    let player = table
        .player(seat)
        .ok_or(EngineError::Internal("seat_of returned an empty seat"))?;

    if player.is_ready {
        return Err(EngineError::AlreadyReady(user_id));
    }
    if player.selected_stake.is_zero() {
        return Err(EngineError::NoStakeSelected);
    }
    Ok((seat, player.selected_stake))
}

/// Зафиксировать ставку после успешного списания.
/// Возвращает `true`, если теперь готовы все сидящие игроки.
pub fn mark_ready(table: &mut Table, seat: SeatIndex, stake: Chips) -> Result<bool, EngineError> {
    ensure_pre_deal(table)?;
    let player = table
        .player_mut(seat)
        .ok_or(EngineError::Internal("mark_ready on an empty seat"))?;
    if player.is_ready {
        return Err(EngineError::AlreadyReady(player.user_id));
    }

    player.stake = stake;
    player.is_ready = true;
    player.status = PlayerStatus::Waiting;
    let user_id = player.user_id;

    table.history.push(HandEventKind::StakeLocked {
        seat,
        user_id,
        stake,
    });
    Ok(table.ready_count() == table.seated_count())
}

/// Закрыть приём ставок: снять неготовых и раздать карты,
/// либо закрыть стол, если не готов никто.
pub fn close_betting(table: &mut Table) -> Result<BettingClosed, EngineError> {
    if table.status != TableStatus::Betting {
        return Err(EngineError::WrongStatus(table.status));
    }

    let mut dropped = Vec::new();
    for slot in table.seats.iter_mut() {
        if slot.as_ref().is_some_and(|p| !p.is_in_round()) {
            if let Some(p) = slot.take() {
                dropped.push(p.user_id);
            }
        }
    }
    if !dropped.is_empty() {
        table.history.push(HandEventKind::PlayersDropped {
            user_ids: dropped.clone(),
        });
    }

    if table.ready_count() == 0 {
        table.status = TableStatus::Finished;
        table
            .history
            .push(HandEventKind::Cancelled { refunds: Vec::new() });
        return Ok(BettingClosed::Cancelled { dropped });
    }

    let first = deal(table)?;
    Ok(BettingClosed::Dealt { dropped, first })
}

/// Раздача: порядок ходов перемешивается, каждому по две карты,
/// дилеру две. Xì Bàn сразу уходит в Blackjack.
pub fn deal(table: &mut Table) -> Result<TurnState, EngineError> {
    let fresh = table.dealer_hand.is_empty() && table.turn_order.is_empty();
    let status_ok = match table.kind {
        TableKind::Multi => table.status == TableStatus::Betting,
        TableKind::Solo => table.status == TableStatus::Playing,
    };
    if !fresh || !status_ok {
        return Err(EngineError::WrongStatus(table.status));
    }

    let mut order: Vec<SeatIndex> = table
        .players()
        .filter(|p| p.is_in_round())
        .map(|p| p.seat)
        .collect();
    if order.is_empty() {
        return Err(EngineError::NoReadyPlayers);
    }
    table.rng.shuffle(&mut order);

    for &seat in &order {
        let cards = table.deck.draw(2, &mut table.rng);
        if let Some(player) = table.player_mut(seat) {
            player.hand = cards;
            player.status = if determine_hand_type(&player.hand).1 == HandType::XiBan {
                PlayerStatus::Blackjack
            } else {
                PlayerStatus::Waiting
            };
        }
    }
    table.dealer_hand = table.deck.draw(2, &mut table.rng);

    table.status = TableStatus::Playing;
    table.turn_order = order.clone();
    table.current_turn_index = 0;
    table.history.push(HandEventKind::CardsDealt {
        turn_order: order,
        dealer_cards: table.dealer_hand.clone(),
    });

    Ok(activate_current(table))
}

/// Найти первого ещё не походившего игрока начиная с текущего индекса
/// и отдать ему ход. Если таких нет: ход дилера.
fn activate_current(table: &mut Table) -> TurnState {
    while table.current_turn_index < table.turn_order.len() {
        let idx = table.current_turn_index;
        let seat = table.turn_order[idx];
        if let Some(player) = table.player_mut(seat) {
            if player.status == PlayerStatus::Waiting {
                player.status = PlayerStatus::Playing;
                return TurnState::Turn {
                    seat,
                    turn_index: idx,
                    user_id: player.user_id,
                };
            }
        }
        table.current_turn_index += 1;
    }

    table.status = TableStatus::DealerTurn;
    let value = calculate_value(&table.dealer_hand);
    table
        .history
        .push(HandEventKind::DealerTurnStarted { value });
    TurnState::DealerTurn
}

fn advance_turn(table: &mut Table) -> TurnState {
    table.current_turn_index += 1;
    activate_current(table)
}

/// Текущий ход в виде `TurnState` (для таймера и представлений).
pub fn current_turn(table: &Table) -> Option<TurnState> {
    match table.status {
        TableStatus::Playing => {
            let seat = table.current_seat()?;
            let player = table.player(seat)?;
            Some(TurnState::Turn {
                seat,
                turn_index: table.current_turn_index,
                user_id: player.user_id,
            })
        }
        TableStatus::DealerTurn => Some(TurnState::DealerTurn),
        _ => None,
    }
}

/// Сколько нужно доплатить за double. Проверяет ход и право на удвоение.
pub fn double_cost(table: &Table, user_id: UserId) -> Result<(SeatIndex, Chips), EngineError> {
    let action = PlayerAction::new(user_id, PlayerActionKind::Double);
    let seat = validate_action(table, &action)?;
    let stake = table
        .player(seat)
        .map(|p| p.stake)
        .ok_or(EngineError::Internal("validated seat is empty"))?;
    Ok((seat, stake))
}

/// Применить Hit/Stand/Double. Для Double доплата уже должна быть
/// списана вызывающим кодом.
pub fn apply_action(table: &mut Table, action: PlayerAction) -> Result<ActionOutcome, EngineError> {
    let seat = validate_action(table, &action)?;

    let card = match action.kind {
        PlayerActionKind::Hit | PlayerActionKind::Double => {
            Some(table.deck.draw_one(&mut table.rng))
        }
        PlayerActionKind::Stand => None,
    };

    let player = table
        .player_mut(seat)
        .ok_or(EngineError::Internal("validated seat is empty"))?;

    match action.kind {
        PlayerActionKind::Hit => {
            if let Some(card) = card {
                player.take_card(card);
            }
        }
        PlayerActionKind::Stand => {
            player.status = PlayerStatus::Stand;
        }
        PlayerActionKind::Double => {
            player.stake = player.stake.times(2);
            player.has_doubled = true;
            if let Some(card) = card {
                player.take_card(card);
            }
            if player.status == PlayerStatus::Playing {
                player.status = PlayerStatus::Stand;
            }
        }
    }

    let status_after = player.status;
    let value_after = player.hand_value();
    table.history.push(HandEventKind::PlayerActed {
        seat,
        action: action.kind,
        card,
        value_after,
    });

    let next = if status_after.is_terminal() {
        advance_turn(table)
    } else {
        TurnState::Turn {
            seat,
            turn_index: table.current_turn_index,
            user_id: action.user_id,
        }
    };

    Ok(ActionOutcome {
        seat,
        kind: action.kind,
        card,
        status_after,
        next,
    })
}

/// Принудительный Stand по таймеру. Срабатывает, только если ход
/// всё ещё тот же самый; иначе ничего не делает и возвращает `None`.
pub fn force_stand(table: &mut Table, turn_index: usize, seat: SeatIndex) -> Option<TurnState> {
    if table.status != TableStatus::Playing
        || table.current_turn_index != turn_index
        || table.current_seat() != Some(seat)
    {
        return None;
    }

    let player = table.player_mut(seat)?;
    if player.status != PlayerStatus::Playing {
        return None;
    }
    player.status = PlayerStatus::Stand;
    let value = player.hand_value();

    table
        .history
        .push(HandEventKind::TurnTimedOut { seat, value });
    Some(advance_turn(table))
}

/// Один шаг политики дилера.
pub fn dealer_step(table: &mut Table) -> Result<DealerStep, EngineError> {
    if table.status != TableStatus::DealerTurn {
        return Err(EngineError::WrongStatus(table.status));
    }

    let (decision, reason) = dealer_decision(&table.dealer_hand);
    match decision {
        DealerDecision::Hit => {
            let card = table.deck.draw_one(&mut table.rng);
            table.dealer_hand.push(card);
            let value_after = calculate_value(&table.dealer_hand);
            table
                .history
                .push(HandEventKind::DealerDrew { card, value_after });
            Ok(DealerStep::Drew { card, value_after })
        }
        DealerDecision::Stand => Ok(DealerStep::Stood {
            value: calculate_value(&table.dealer_hand),
            reason,
        }),
    }
}

/// Расчёт. Переводит стол в Finished до возврата, так что второй
/// вызов получит `WrongStatus` и ничего не выплатит.
pub fn settle(table: &mut Table) -> Result<Vec<SeatSettlement>, EngineError> {
    if table.status != TableStatus::DealerTurn {
        return Err(EngineError::WrongStatus(table.status));
    }
    table.status = TableStatus::Finished;

    let dealer = table.dealer_hand.clone();
    let mut results = Vec::new();
    for &seat in &table.turn_order {
        let Some(player) = table.player(seat) else {
            continue;
        };
        let (value, hand_type) = determine_hand_type(&player.hand);
        let cmp = compare(&player.hand, &dealer);
        results.push(SeatSettlement {
            seat,
            user_id: player.user_id,
            display_name: player.display_name.clone(),
            stake: player.stake,
            hand: player.hand.clone(),
            value,
            hand_type,
            outcome: cmp.outcome,
            multiplier: cmp.multiplier,
            payout: player.stake.times(cmp.multiplier),
            busted: hand_type == HandType::Bust,
        });
    }

    for r in &results {
        table.history.push(HandEventKind::SeatSettled {
            seat: r.seat,
            user_id: r.user_id,
            outcome: r.outcome,
            hand_type: r.hand_type,
            payout: r.payout,
        });
    }
    Ok(results)
}

/// Закрыть стол без расчёта (сборщик мусора, отмена).
/// Возвращает ставки, которые нужно вернуть. Повторный вызов: пустой список.
#[must_use]
pub fn cancel(table: &mut Table) -> Vec<(UserId, Chips)> {
    if table.status == TableStatus::Finished {
        return Vec::new();
    }

    let refunds: Vec<(UserId, Chips)> = table
        .players()
        .filter(|p| p.is_in_round())
        .map(|p| (p.user_id, p.stake))
        .collect();

    table.status = TableStatus::Finished;
    table.history.push(HandEventKind::Cancelled {
        refunds: refunds.clone(),
    });
    refunds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::Deck;
    use crate::infra::rng::DeterministicRng;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn multi_table() -> Table {
        Table::new(1, 10, 100, TableKind::Multi, 8, DeterministicRng::from_seed(7))
    }

    fn ready(table: &mut Table, user: UserId, stake: u64) {
        select_stake(table, user, Chips(stake), Chips(1)).unwrap();
        let (seat, amount) = prepare_ready(table, user).unwrap();
        mark_ready(table, seat, amount).unwrap();
    }

    #[test]
    fn unready_players_are_dropped_at_close() {
        let mut t = multi_table();
        seat_player(&mut t, 100, "host".into()).unwrap();
        seat_player(&mut t, 200, "late".into()).unwrap();
        open_betting(&mut t).unwrap();
        ready(&mut t, 100, 10);

        let closed = close_betting(&mut t).unwrap();
        match closed {
            BettingClosed::Dealt { dropped, .. } => assert_eq!(dropped, vec![200]),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(t.seated_count(), 1);
        assert_eq!(t.status, TableStatus::Playing);
    }

    #[test]
    fn nobody_ready_cancels_table() {
        let mut t = multi_table();
        seat_player(&mut t, 100, "host".into()).unwrap();
        open_betting(&mut t).unwrap();

        let closed = close_betting(&mut t).unwrap();
        assert_eq!(closed, BettingClosed::Cancelled { dropped: vec![100] });
        assert!(t.is_finished());
    }

    #[test]
    fn second_ready_is_rejected() {
        let mut t = multi_table();
        seat_player(&mut t, 100, "host".into()).unwrap();
        ready(&mut t, 100, 5);
        assert_eq!(
            prepare_ready(&t, 100),
            Err(EngineError::AlreadyReady(100))
        );
    }

    #[test]
    fn force_stand_ignores_stale_ticket() {
        let mut t = multi_table();
        seat_player(&mut t, 100, "a".into()).unwrap();
        open_betting(&mut t).unwrap();
        ready(&mut t, 100, 5);
        // Рука 10+6, дилер 10+7.
        t.deck = Deck::stacked(cards("10s 6h 10d 7c"));

        let first = close_betting(&mut t).unwrap();
        let BettingClosed::Dealt { first: TurnState::Turn { seat, turn_index, .. }, .. } = first
        else {
            panic!("expected player turn");
        };

        apply_action(&mut t, PlayerAction::new(100, PlayerActionKind::Stand)).unwrap();
        assert_eq!(t.status, TableStatus::DealerTurn);
        assert_eq!(force_stand(&mut t, turn_index, seat), None);
    }

    #[test]
    fn settle_runs_once() {
        let mut t = multi_table();
        seat_player(&mut t, 100, "a".into()).unwrap();
        open_betting(&mut t).unwrap();
        ready(&mut t, 100, 5);
        t.deck = Deck::stacked(cards("10s 9h 10d 7c"));
        close_betting(&mut t).unwrap();
        apply_action(&mut t, PlayerAction::new(100, PlayerActionKind::Stand)).unwrap();

        assert!(matches!(dealer_step(&mut t), Ok(DealerStep::Stood { value: 17, .. })));
        let results = settle(&mut t).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, Outcome::Win);
        assert_eq!(results[0].payout, Chips(10));
        assert!(settle(&mut t).is_err());
    }
}
