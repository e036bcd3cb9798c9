//! An in-process transport connecting exactly two registered owners,
//! standing in for a real network transport in tests and the demo CLI.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::endpoint::{MessageCallback, Readiness, RodaEndpoint};
use crate::error::{Error, Result};

/// The largest request/response size the loopback transport will grant,
/// regardless of what a registrant proposes. Exists so `roda-client`'s
/// readiness-clamping logic has something real to clamp against even over
/// an in-process transport with no actual frame limit.
pub const LOOPBACK_MAX_FRAME: u32 = 64 * 1024;

#[derive(Default)]
pub struct LoopbackEndpoint {
    peers: Mutex<HashMap<u32, MessageCallback>>,
}

impl LoopbackEndpoint {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RodaEndpoint for LoopbackEndpoint {
    fn register(
        &self,
        owner_id: u32,
        proposed: Readiness,
        on_message: MessageCallback,
    ) -> Result<Readiness> {
        let mut peers = self.peers.lock().expect("loopback mutex poisoned");
        if peers.len() >= 2 && !peers.contains_key(&owner_id) {
            return Err(Error::TooManyPeers);
        }
        if peers.insert(owner_id, on_message).is_some() {
            return Err(Error::AlreadyRegistered(owner_id));
        }
        Ok(proposed.clamp_to(LOOPBACK_MAX_FRAME))
    }

    fn unregister(&self, owner_id: u32) -> Result<()> {
        let mut peers = self.peers.lock().expect("loopback mutex poisoned");
        peers
            .remove(&owner_id)
            .map(|_| ())
            .ok_or(Error::NotRegistered(owner_id))
    }

    fn send(&self, owner_id: u32, payload: Vec<u8>) -> Result<()> {
        let peers = self.peers.lock().expect("loopback mutex poisoned");
        if !peers.contains_key(&owner_id) {
            return Err(Error::NotRegistered(owner_id));
        }
        let peer = peers
            .iter()
            .find(|(id, _)| **id != owner_id)
            .map(|(_, cb)| cb.clone())
            .ok_or(Error::NoPeer)?;
        drop(peers);

        std::thread::spawn(move || {
            log::trace!("loopback delivering {} bytes", payload.len());
            peer(payload);
        });
        Ok(())
    }
}
