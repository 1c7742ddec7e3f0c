mod catalog;
mod scripted;
mod simulated;

pub use scripted::{ProviderCall, ScriptedProvider, ScriptedResponse};
pub use simulated::{SimulatedProvider, BAD_PARAMETER_CODE};
