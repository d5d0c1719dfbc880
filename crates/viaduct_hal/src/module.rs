//! Vendor Module Loading
//!
//! Locating and opening a vendor binary is a host concern; the shim only
//! sees the [`AudioModuleLoader`] it is given. What the shim does own is
//! the process-wide handle each module kind keeps to its loaded vendor
//! binary: populated once on first open, shared by every subsequent open,
//! never released for the life of the process.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info};

use crate::config::ShimConfig;
use crate::device::DeviceAdapter;
use crate::error::{HalError, HalResult};
use crate::legacy::LegacyAudioDevice;

/// Module identifier the host uses to select the device shim.
pub const AUDIO_MODULE_ID: &str = "audio";

/// Interface name served by the device shim.
pub const AUDIO_DEVICE_INTERFACE: &str = "audio_hw_if";

/// Name under which a wrapped vendor binary is looked up.
///
/// The shim registers under the host-facing identifier; the vendor binary
/// it drives is installed under the same identifier carrying this prefix,
/// so the host's module loader never selects the vendor directly.
pub fn vendor_module_id(module_id: &str) -> String {
    format!("vendor-{module_id}")
}

/// A loaded vendor audio module, able to open device instances.
pub trait VendorAudioModule: Send + Sync {
    fn open_device(&self, interface: &str) -> HalResult<Box<dyn LegacyAudioDevice>>;
}

/// Locates and opens vendor binaries on behalf of the shim.
pub trait AudioModuleLoader: Send + Sync {
    fn load(&self, module_id: &str) -> HalResult<Arc<dyn VendorAudioModule>>;
}

/// Process-wide once-initialized handle to a loaded vendor module.
///
/// The mutex makes first use safe against concurrent opens. A failed load
/// leaves the slot unset, so the next open attempts the load again; a
/// successful load is never repeated and never released.
pub struct ModuleCache<M: ?Sized> {
    slot: Mutex<Option<Arc<M>>>,
}

impl<M: ?Sized> ModuleCache<M> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached module, loading it with `load` on first use.
    pub fn get_or_load(&self, load: impl FnOnce() -> HalResult<Arc<M>>) -> HalResult<Arc<M>> {
        let mut slot = self.slot.lock();
        if let Some(module) = slot.as_ref() {
            return Ok(Arc::clone(module));
        }
        let module = load()?;
        *slot = Some(Arc::clone(&module));
        Ok(module)
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<M: ?Sized> Default for ModuleCache<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Host-facing entry point of the device shim.
///
/// One instance exists per process; it owns the vendor module handle
/// shared by every device it opens.
pub struct AudioShimModule {
    loader: Arc<dyn AudioModuleLoader>,
    vendor: ModuleCache<dyn VendorAudioModule>,
    config: ShimConfig,
}

impl AudioShimModule {
    pub fn new(loader: Arc<dyn AudioModuleLoader>, config: ShimConfig) -> Self {
        Self {
            loader,
            vendor: ModuleCache::new(),
            config,
        }
    }

    /// Open the device interface, wrapping the vendor's implementation.
    ///
    /// Interface names this module does not provide are rejected before
    /// the loader is consulted. Vendor load and open failures are
    /// reported with the vendor's own code, unchanged.
    pub fn open_device(&self, interface: &str) -> HalResult<DeviceAdapter> {
        if interface != AUDIO_DEVICE_INTERFACE {
            return Err(HalError::InvalidArgument(format!(
                "no such interface: {interface}"
            )));
        }

        let vendor_id = vendor_module_id(AUDIO_MODULE_ID);
        info!("wrapping vendor module {vendor_id}");

        let module = self
            .vendor
            .get_or_load(|| self.loader.load(&vendor_id))
            .map_err(|err| {
                error!("failed to load vendor module {vendor_id}: {err}");
                err
            })?;

        let device = module.open_device(interface)?;
        Ok(DeviceAdapter::new(device, &self.config))
    }
}
