//! The per-opcode handler contract.

use emberlink_protocol::PacketBuffer;

use crate::dispatch::DispatchError;

/// The unit of logic behind one server opcode: decode the payload,
/// apply its effect to external game state, report success or failure.
///
/// # Contract
///
/// The dispatcher hands `handle` the shared receive buffer positioned
/// at the start of the message, **opcode byte still present** — the
/// handler consumes the opcode itself before reading fields (a
/// historical-format carryover every handler observes).
///
/// Every implementation follows the same discipline:
///
/// 1. Gate on the minimum fixed-size prefix first:
///    `data.require(MIN)?` — returns `InsufficientData` and touches
///    nothing when the prefix hasn't fully arrived.
/// 2. Take a working copy (`working.copy_from(data)`) and do all
///    destructive reads on the copy. A variable-length payload can
///    still turn out to be incomplete mid-parse; failing on the copy
///    leaves the shared buffer byte-identical, so the dispatcher can
///    retry the exact same parse once more bytes arrive.
/// 3. Apply the opcode's effect — mutate exactly the game state its
///    semantics imply, through the injected [`GameStateSink`].
/// 4. Commit: `data.copy_from(&working)`. This both advances past the
///    message and trims the consumed bytes from the shared buffer.
///
/// A handler that returns `InsufficientData` must have performed **no
/// state mutation and no buffer advance** — the error is transient and
/// the same dispatch will run again. Any other error is fatal to the
/// connection.
///
/// Handlers are synchronous and CPU-bound: exactly one executes at a
/// time, on the read-loop task, and a handler that blocked would stall
/// every message behind it (delivery is strictly FIFO because later
/// messages routinely assume the state earlier ones produced).
///
/// [`GameStateSink`]: crate::GameStateSink
pub trait PacketHandler: Send + Sync {
    /// Decodes one message and applies its effect.
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError>;
}
