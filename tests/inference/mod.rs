mod estimation_tests;
mod sampling_tests;
