//! Card vocabulary: ranks, suits, and the fixed scoring table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The thirteen card ranks, ordered low to high.
///
/// The derived `Ord` follows declaration order, so `Rank::Two` is the
/// lowest and `Rank::Ace` the highest — this is the total order used to
/// pick a player's best card. Serde renames match the deck service and
/// the client: `"2"` through `"10"`, then `"JACK"`, `"QUEEN"`, `"KING"`,
/// `"ACE"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "JACK")]
    Jack,
    #[serde(rename = "QUEEN")]
    Queen,
    #[serde(rename = "KING")]
    King,
    #[serde(rename = "ACE")]
    Ace,
}

impl Rank {
    /// All ranks, low to high.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Point value awarded for scoring this rank as the highest held card.
    pub fn points(self) -> u32 {
        match self {
            Rank::Two => 10,
            Rank::Three => 20,
            Rank::Four => 30,
            Rank::Five => 40,
            Rank::Six => 50,
            Rank::Seven => 60,
            Rank::Eight => 70,
            Rank::Nine => 80,
            Rank::Ten => 100,
            Rank::Jack => 125,
            Rank::Queen => 150,
            Rank::King => 200,
            Rank::Ace => 400,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "JACK",
            Rank::Queen => "QUEEN",
            Rank::King => "KING",
            Rank::Ace => "ACE",
        };
        write!(f, "{s}")
    }
}

/// The four suits. Suit never affects scoring; it exists so drawn cards
/// can be rendered faithfully on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All four suits.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

/// A single playing card as seen on the wire.
///
/// The rank field is named `value` in JSON because that is what both the
/// deck service and the client call it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub value: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(value: Rank, suit: Suit) -> Self {
        Self { value, suit }
    }
}
