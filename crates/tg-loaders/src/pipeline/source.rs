//! Where the pipeline gets its subnet list.

use async_trait::async_trait;
use tg_models::SubnetIdentity;

use crate::{DataLoader, IdentityLoader, IdentityLoaderInput, LoaderContext, LoaderResult};

#[async_trait]
pub trait SubnetSource: Send + Sync {
  /// Every known subnet, or only `targets` when given.
  async fn identities(&self, targets: Option<Vec<i64>>) -> LoaderResult<Vec<SubnetIdentity>>;
}

/// Identity feed from the Taostats API.
pub struct TaostatsSubnetSource {
  context: LoaderContext,
}

impl TaostatsSubnetSource {
  pub fn new(context: LoaderContext) -> Self {
    Self { context }
  }
}

#[async_trait]
impl SubnetSource for TaostatsSubnetSource {
  async fn identities(&self, targets: Option<Vec<i64>>) -> LoaderResult<Vec<SubnetIdentity>> {
    IdentityLoader::new().load(&self.context, IdentityLoaderInput { target_netuids: targets }).await
  }
}
