//! Provider session lifecycle.
//!
//! [`SessionGuard::with_session`] logs in, runs exactly one unit of work
//! against a [`ProviderSession`] and logs out on every exit path, including
//! errors and panics inside the body.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::stdio::quietly;
use crate::{DataConfig, DataError, ProviderClient, ProviderFault, QueryDescriptor, RowCursor};

/// The provider's single ambient login slot.
#[derive(Debug, Default)]
pub struct SessionSlot {
    active: AtomicBool,
}

impl SessionSlot {
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<SlotClaim<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SlotClaim { slot: self })
    }
}

struct SlotClaim<'a> {
    slot: &'a SessionSlot,
}

impl Drop for SlotClaim<'_> {
    fn drop(&mut self) {
        self.slot.active.store(false, Ordering::Release);
    }
}

/// Handle to a logged-in provider. Exists only inside a `with_session` body;
/// dropping it logs out.
pub struct ProviderSession<'a, P: ProviderClient> {
    provider: &'a P,
    quiet_stdout: bool,
}

impl<P: ProviderClient> ProviderSession<'_, P> {
    pub fn query(&self, query: &QueryDescriptor) -> Result<Box<dyn RowCursor>, ProviderFault> {
        self.provider.query(query)
    }
}

impl<P: ProviderClient> Drop for ProviderSession<'_, P> {
    fn drop(&mut self) {
        debug!("logging out of provider");
        let provider = self.provider;
        if let Err(err) = quietly(self.quiet_stdout, || provider.logout()) {
            warn!(error = %err, "provider logout failed");
        }
    }
}

/// Owns a provider client and serializes access to its login slot.
pub struct SessionGuard<P> {
    provider: P,
    slot: SessionSlot,
    quiet_stdout: bool,
}

impl<P: ProviderClient> SessionGuard<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, &DataConfig::default())
    }

    pub fn with_config(provider: P, config: &DataConfig) -> Self {
        Self {
            provider,
            slot: SessionSlot::new(),
            quiet_stdout: config.suppress_provider_stdout,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_active(&self) -> bool {
        self.slot.is_active()
    }

    /// Runs `body` inside one provider session.
    ///
    /// A failed login returns a `Login` error without running `body`. Logout
    /// failures are logged and never replace the body's outcome. Stdout is
    /// silenced around login and logout only.
    pub fn with_session<T, F>(&self, body: F) -> Result<T, DataError>
    where
        F: FnOnce(&ProviderSession<'_, P>) -> Result<T, DataError>,
    {
        let _claim = self
            .slot
            .try_acquire()
            .ok_or_else(|| DataError::login("provider session already active"))?;

        debug!("logging in to provider");
        let provider = &self.provider;
        let status = quietly(self.quiet_stdout, || provider.login());
        if !status.is_success() {
            warn!(code = %status.code, message = %status.message, "provider login failed");
            return Err(
                DataError::login(format!("provider login failed: {}", status.message))
                    .with_code(status.code),
            );
        }

        let session = ProviderSession {
            provider,
            quiet_stdout: self.quiet_stdout,
        };
        let outcome = body(&session);
        drop(session);
        outcome
    }
}
