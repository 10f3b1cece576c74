//! Round system
//!
//! One [`RoundController`] per prize. Every prize unit is raffled over three
//! rounds: two elimination rounds followed by the winner round.
//!
//! | round | 1 | 2 | 3 | 4 | 5 | 6 |
//! |-------|---|---|---|---|---|---|
//! | kind  | L | L | W | L | L | W |
//! | unit  |   |   | 1 |   |   | 2 |

mod controller;


pub use controller::{
    RoundAdvance, RoundController, is_winner_round, unit_for_round, validate_prize,
};
