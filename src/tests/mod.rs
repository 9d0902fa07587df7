mod fixtures;
mod integration_tests;
mod limit_tests;
