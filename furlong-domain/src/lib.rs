//! Furlong Domain Layer
//!
//! Pure domain logic with zero I/O dependencies: orders and their lifecycle
//! state machine, instruction payloads, and the instruction reports returned
//! by the exchange.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod instructions;
pub mod order;
pub mod reports;
pub mod value_objects;

// Re-export commonly used types
pub use instructions::{
    CancelInstruction, PlaceInstruction, ReplaceInstruction, UpdateInstruction,
};
pub use order::{ExchangeResponse, Order, OrderStatus, ResponseEntry, ResponseLog};
pub use reports::{
    CancelInstructionReport, CancelResponse, ExecutionErrorCode, InstructionStatus,
    PlaceInstructionReport, PlaceResponse, ReplaceInstructionReport, ReplaceResponse,
    UpdateInstructionReport, UpdateResponse,
};
pub use value_objects::{
    BetId, CustomerRef, DomainError, MarketId, MarketVersion, OrderId, PersistenceType, Price,
    SelectionId, Side, Size,
};
