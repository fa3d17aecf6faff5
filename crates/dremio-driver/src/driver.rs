// SPDX-License-Identifier: Apache-2.0

//! Driver registration
//!
//! Mirrors the host-framework convention of discovering drivers by name: a
//! process-wide registry maps names to driver instances, pre-seeded with
//! the Dremio driver under [`DRIVER_NAME`], and [`open`] is the sole entry
//! point for name-routed connection establishment.

use crate::connection::Connection;
use crate::error::{DremioError, DremioResult};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Public name the Dremio driver registers under
pub const DRIVER_NAME: &str = "dremio";

/// A registrable connection factory
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a new connection from a DSN
    async fn open(&self, dsn: &str) -> DremioResult<Connection>;
}

/// The Dremio REST driver
#[derive(Debug, Default)]
pub struct DremioDriver;

#[async_trait]
impl Driver for DremioDriver {
    async fn open(&self, dsn: &str) -> DremioResult<Connection> {
        Connection::connect(dsn).await
    }
}

static REGISTRY: Lazy<RwLock<HashMap<String, Arc<dyn Driver>>>> = Lazy::new(|| {
    let mut drivers: HashMap<String, Arc<dyn Driver>> = HashMap::new();
    drivers.insert(DRIVER_NAME.to_string(), Arc::new(DremioDriver));
    RwLock::new(drivers)
});

/// Register a driver under a name, replacing any previous registration
pub fn register(name: impl Into<String>, driver: Arc<dyn Driver>) {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.into(), driver);
}

/// Open a connection through the driver registered under `name`
pub async fn open(name: &str, dsn: &str) -> DremioResult<Connection> {
    let driver = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
        .ok_or_else(|| DremioError::UnknownDriver(name.to_string()))?;
    driver.open(dsn).await
}
