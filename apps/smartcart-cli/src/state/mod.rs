//! # State Module
//!
//! Cart state held by the CLI while a command runs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SessionRegistry                                                │   │
//! │  │  Mutex<BTreeMap<name, CartState>>                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐                  │
//! │  │  CartState   │  │  CartState   │  │  CartState   │                  │
//! │  │  "default"   │  │  "alice"     │  │  "bob"       │                  │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<  │  │  Arc<Mutex<  │                  │
//! │  │    Cart>>    │  │    Cart>>    │  │    Cart>>    │                  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘                  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Registry lock is held only to look up or create a session           │
//! │  • Each cart has its own lock, so sessions never block each other      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod session;

pub use cart::CartState;
pub use session::{SessionRegistry, DEFAULT_SESSION};
