mod likelihood_tests;
mod team_tests;
