//! Handlers for absolute player-stat updates.
//!
//! These are the simplest messages in the protocol: opcode plus one
//! fixed-width value, applied as an absolute set on the sink (which
//! makes them naturally idempotent).

use std::sync::Arc;

use emberlink_protocol::PacketBuffer;

use crate::dispatch::DispatchError;
use crate::handler::PacketHandler;
use crate::sink::GameStateSink;

/// Expands to a stat handler struct: gate on the fixed message size,
/// read the value, forward it to one sink setter.
macro_rules! stat_handler {
    ($(#[$doc:meta])* $name:ident, $read:ident, $size:expr, $setter:ident) => {
        $(#[$doc])*
        pub struct $name {
            sink: Arc<dyn GameStateSink>,
        }

        impl $name {
            pub fn new(sink: &Arc<dyn GameStateSink>) -> Self {
                Self {
                    sink: Arc::clone(sink),
                }
            }
        }

        impl PacketHandler for $name {
            fn handle(
                &self,
                data: &mut PacketBuffer,
            ) -> Result<(), DispatchError> {
                data.require($size)?;

                let mut buffer = PacketBuffer::new();
                buffer.copy_from(data);
                buffer.read_byte()?; // opcode

                let value = buffer.$read()?;
                self.sink.$setter(value);

                data.copy_from(&buffer);
                Ok(())
            }
        }
    };
}

stat_handler!(
    /// `UpdateStrength` — absolute strength attribute.
    UpdateStrengthHandler, read_byte, 2, set_strength
);
stat_handler!(
    /// `UpdateDexterity` — absolute dexterity attribute.
    UpdateDexterityHandler, read_byte, 2, set_dexterity
);
stat_handler!(
    /// `UpdateGold` — absolute gold amount.
    UpdateGoldHandler, read_int, 5, set_gold
);
stat_handler!(
    /// `UpdateExp` — absolute experience amount.
    UpdateExpHandler, read_int, 5, set_experience
);
stat_handler!(
    /// `UpdateHp` — current hit points.
    UpdateHpHandler, read_short, 3, set_health
);
stat_handler!(
    /// `UpdateMana` — current mana points.
    UpdateManaHandler, read_short, 3, set_mana
);
stat_handler!(
    /// `UpdateSta` — current stamina points.
    UpdateStaHandler, read_short, 3, set_stamina
);
