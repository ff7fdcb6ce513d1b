//! Tiến Lên round flow.
//!
//! - The whole deck is dealt round-robin to 2-4 players
//! - The holder of the lowest card leads and must play it
//! - Each player beats the pile or passes; when everyone else has passed
//!   the last player to play leads a new trick
//! - Players go out by emptying their hand; the round ends when at most one
//!   player still holds cards
//!
//! Every operation takes a state and returns a new one, so a rejected
//! action leaves the caller's state untouched.

mod game;

pub use game::{
    apply_pass, apply_play, legal_moves, new_round, round_from_hands, undo_last, TienLen,
    TienLenBuilder, PLAYER_RANGE,
};
