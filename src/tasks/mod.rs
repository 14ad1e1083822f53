pub mod countdown;
pub mod live_tally;
