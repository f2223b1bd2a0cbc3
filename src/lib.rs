pub use {
    self::{blueprint::*, search::*, state::*, util::*},
    clap::Parser,
};

mod blueprint;
mod search;
mod state;
mod util;
