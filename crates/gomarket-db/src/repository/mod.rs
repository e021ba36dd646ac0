//! # Repository Module
//!
//! SQLite repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartService                                                           │
//! │       │                                                                 │
//! │       │  storage.set_item(key, snapshot)   (via KeyValueStorage)       │
//! │       ▼                                                                 │
//! │  KeyValueRepository                                                    │
//! │  ├── get_item(&self, key)                                              │
//! │  ├── set_item(&self, key, value)                                       │
//! │  ├── remove_item(&self, key)                                           │
//! │  └── keys(&self)                                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  key_value_store table                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod key_value;
