mod event_scheduler_tests;
mod relation_tests;
