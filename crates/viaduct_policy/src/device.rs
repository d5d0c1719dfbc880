//! Policy Device Adapter and Module Entry Point
//!
//! The policy device is the factory for policy objects. Creating a policy
//! builds the service callback adapter from the host-supplied table,
//! hands it to the vendor's creation entry point, and wraps the returned
//! vendor policy; destroying one forwards destruction to the vendor and
//! releases the adapter together with its service adapter.

use std::sync::Arc;

use tracing::{error, info};

use viaduct_hal::{vendor_module_id, HalError, HalResult, ModuleCache, ShimConfig};

use crate::legacy::{LegacyPolicyDevice, LegacyPolicyService};
use crate::policy::PolicyAdapter;
use crate::service::PolicyServiceAdapter;
use crate::traits::PolicyService;

/// Module identifier the host uses to select the policy shim.
pub const POLICY_MODULE_ID: &str = "audio_policy";

/// Interface name served by the policy shim.
pub const POLICY_INTERFACE: &str = "policy";

/// A loaded vendor policy module, able to open policy devices.
pub trait VendorPolicyModule: Send + Sync {
    fn open_policy_device(&self, interface: &str) -> HalResult<Box<dyn LegacyPolicyDevice>>;
}

/// Locates and opens vendor policy binaries on behalf of the shim.
pub trait PolicyModuleLoader: Send + Sync {
    fn load(&self, module_id: &str) -> HalResult<Arc<dyn VendorPolicyModule>>;
}

/// Current-generation policy device surface over a legacy vendor policy
/// device.
pub struct PolicyDeviceAdapter {
    vendor: Box<dyn LegacyPolicyDevice>,
    config: ShimConfig,
}

impl std::fmt::Debug for PolicyDeviceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyDeviceAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PolicyDeviceAdapter {
    pub fn new(vendor: Box<dyn LegacyPolicyDevice>, config: &ShimConfig) -> Self {
        Self {
            vendor,
            config: config.clone(),
        }
    }

    /// Create a policy, wiring the host's callback table through the
    /// reverse-direction adapter so the vendor can call back into it.
    pub fn create_policy(&mut self, service: Arc<dyn PolicyService>) -> HalResult<PolicyAdapter> {
        let codec = self.config.codec();
        let service = Arc::new(PolicyServiceAdapter::new(service, codec));

        let vendor_policy = self
            .vendor
            .create_policy(Arc::clone(&service) as Arc<dyn LegacyPolicyService>)?;

        Ok(PolicyAdapter::new(vendor_policy, service, codec))
    }

    /// Destroy a policy: the vendor first, then the adapter and its
    /// service adapter.
    pub fn destroy_policy(&mut self, policy: PolicyAdapter) -> HalResult<()> {
        let (vendor_policy, _service) = policy.into_parts();
        self.vendor.destroy_policy(vendor_policy)
    }

    /// Shut the vendor policy device down and release the adapter.
    pub fn close(mut self) -> HalResult<()> {
        self.vendor.close()
    }
}

/// Host-facing entry point of the policy shim.
///
/// One instance exists per process; it owns the vendor module handle
/// shared by every policy device it opens. The handle is independent of
/// the device shim's.
pub struct PolicyShimModule {
    loader: Arc<dyn PolicyModuleLoader>,
    vendor: ModuleCache<dyn VendorPolicyModule>,
    config: ShimConfig,
}

impl PolicyShimModule {
    pub fn new(loader: Arc<dyn PolicyModuleLoader>, config: ShimConfig) -> Self {
        Self {
            loader,
            vendor: ModuleCache::new(),
            config,
        }
    }

    /// Open the policy interface, wrapping the vendor's implementation.
    pub fn open_policy_device(&self, interface: &str) -> HalResult<PolicyDeviceAdapter> {
        if interface != POLICY_INTERFACE {
            return Err(HalError::InvalidArgument(format!(
                "no such interface: {interface}"
            )));
        }

        let vendor_id = vendor_module_id(POLICY_MODULE_ID);
        info!("wrapping vendor module {vendor_id}");

        let module = self
            .vendor
            .get_or_load(|| self.loader.load(&vendor_id))
            .map_err(|err| {
                error!("failed to load vendor module {vendor_id}: {err}");
                err
            })?;

        let device = module.open_policy_device(interface)?;
        Ok(PolicyDeviceAdapter::new(device, &self.config))
    }
}
