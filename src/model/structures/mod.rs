pub mod dataset;
pub mod match_record;
pub mod prior_kind;
pub mod team_match;
