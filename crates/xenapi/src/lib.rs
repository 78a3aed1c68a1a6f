pub mod api;
pub mod error;
pub mod provision;
pub mod records;
pub mod rpc;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{to_value, Value};
use url::Url;

use crate::{
    api::{NetworkApi, PifApi, PoolApi, SrApi, VbdApi, VdiApi, VifApi, VmApi},
    error::Result,
    records::SessionRef,
    rpc::RpcClient,
};

const API_VERSION: &str = "2.3";
const ORIGINATOR: &str = "xenbuilder";

/// An authenticated connection to a XenAPI pool manager. Every remote call
/// is issued sequentially against the one session opened at connect time.
pub struct XenClient {
    rpc: RpcClient,
    session: SessionRef,
}

impl XenClient {
    /// Dial the pool manager and open a session with
    /// `session.login_with_password`.
    pub async fn connect(url: Url, username: &str, password: &str) -> Result<XenClient> {
        let rpc = RpcClient::new(url)?;
        let session: SessionRef = rpc
            .call(
                "session.login_with_password",
                vec![
                    to_value(username)?,
                    to_value(password)?,
                    to_value(API_VERSION)?,
                    to_value(ORIGINATOR)?,
                ],
            )
            .await?;
        debug!("logged in as {}", username);
        Ok(XenClient { rpc, session })
    }

    pub async fn logout(&self) -> Result<()> {
        self.call_void("session.logout", vec![]).await
    }

    pub fn vm(&self) -> VmApi {
        VmApi::new(self)
    }

    pub fn pool(&self) -> PoolApi {
        PoolApi::new(self)
    }

    pub fn sr(&self) -> SrApi {
        SrApi::new(self)
    }

    pub fn vdi(&self) -> VdiApi {
        VdiApi::new(self)
    }

    pub fn vbd(&self) -> VbdApi {
        VbdApi::new(self)
    }

    pub fn vif(&self) -> VifApi {
        VifApi::new(self)
    }

    pub fn pif(&self) -> PifApi {
        PifApi::new(self)
    }

    pub fn network(&self) -> NetworkApi {
        NetworkApi::new(self)
    }

    /// Issue a session-scoped call. The session ref is always the first
    /// parameter on the wire.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T> {
        let mut full = Vec::with_capacity(params.len() + 1);
        full.push(to_value(&self.session)?);
        full.extend(params);
        self.rpc.call(method, full).await
    }

    /// For methods returning void, where xapi sends back an empty string.
    pub(crate) async fn call_void(&self, method: &str, params: Vec<Value>) -> Result<()> {
        let _: Value = self.call(method, params).await?;
        Ok(())
    }
}
