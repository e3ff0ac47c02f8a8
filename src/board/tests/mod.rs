//! Unit tests live beside the code they cover; this directory holds the
//! property tests that cut across the board, the search, and selection.
