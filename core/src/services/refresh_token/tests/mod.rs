mod concurrency_tests;
