mod timed_unit;
