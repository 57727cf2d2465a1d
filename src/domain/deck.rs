use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};
use crate::engine::RandomSource;

/// Шуз из одной колоды. Верх колоды: начало вектора.
///
/// Когда карт не хватает, колода пересобирается заново (52 свежие карты)
/// и перемешивается. Сброс в шуз уже сыгранных карт не делается.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
    /// Сколько раз колода пересобиралась из-за нехватки карт.
    pub reshuffles: u32,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Spades A..K, Hearts A..K, Diamonds A..K, Clubs A..K.
    pub fn standard_52() -> Self {
        Deck {
            cards: fresh_cards(),
            reshuffles: 0,
        }
    }

    /// Новая перемешанная колода.
    pub fn shuffled<R: RandomSource>(rng: &mut R) -> Self {
        let mut deck = Self::standard_52();
        rng.shuffle(&mut deck.cards);
        deck
    }

    /// Колода с заранее заданным верхом (для сценариев и реплеев).
    /// После исчерпания ведёт себя как обычный шуз.
    pub fn stacked(top: Vec<Card>) -> Self {
        Deck {
            cards: top,
            reshuffles: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Пересобрать полную колоду и перемешать.
    pub fn reset<R: RandomSource>(&mut self, rng: &mut R) {
        self.cards = fresh_cards();
        rng.shuffle(&mut self.cards);
    }

    /// Взять n карт сверху. Если карт меньше n: сначала полная
    /// пересборка колоды. Для n > 52 к ней добавляются ещё свежие
    /// перемешанные колоды, каждая считается в `reshuffles`.
    /// Ошибок не бывает.
    pub fn draw<R: RandomSource>(&mut self, n: usize, rng: &mut R) -> Vec<Card> {
        if n > self.cards.len() {
            self.reset(rng);
            self.reshuffles += 1;
            while self.cards.len() < n {
                let mut extra = fresh_cards();
                rng.shuffle(&mut extra);
                self.cards.extend(extra);
                self.reshuffles += 1;
            }
        }
        self.cards.drain(..n).collect()
    }

    pub fn draw_one<R: RandomSource>(&mut self, rng: &mut R) -> Card {
        if self.cards.is_empty() {
            self.reset(rng);
            self.reshuffles += 1;
        }
        self.cards.remove(0)
    }
}

fn fresh_cards() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            cards.push(Card::new(rank, suit));
        }
    }
    cards
}
