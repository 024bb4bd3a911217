//! Integration tests for the concern board: submission, voting and leaderboards.

mod leaderboard;
mod submission;
mod voting;
