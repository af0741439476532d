//! Subnet identity loader: names, descriptions and project links.

use async_trait::async_trait;
use tg_models::SubnetIdentity;
use tracing::{info, warn};

use crate::loader::run_tracked;
use crate::{DataLoader, LoaderContext, LoaderError, LoaderResult};

#[derive(Debug, Clone, Default)]
pub struct IdentityLoaderInput {
  /// Keep only these netuids; `None` keeps every subnet
  pub target_netuids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLoader;

impl IdentityLoader {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl DataLoader for IdentityLoader {
  type Input = IdentityLoaderInput;
  type Output = Vec<SubnetIdentity>;

  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output> {
    self.validate_input(&input).await?;
    info!("Loading subnet identities");

    run_tracked(context, self.name(), async {
      let identities = context.client.subnets().identity().await?;
      let fetched = identities.len();

      let identities: Vec<SubnetIdentity> = match &input.target_netuids {
        Some(targets) => {
          let kept: Vec<SubnetIdentity> =
            identities.into_iter().filter(|identity| targets.contains(&identity.netuid)).collect();
          if kept.len() < targets.len() {
            warn!("{} of {} requested subnets not found", targets.len() - kept.len(), targets.len());
          }
          info!("Filtered to {} target subnets", kept.len());
          kept
        }
        None => identities,
      };

      info!("Loaded {} subnet identities ({} fetched)", identities.len(), fetched);
      Ok::<_, LoaderError>(identities)
    })
    .await
  }

  async fn validate_input(&self, input: &Self::Input) -> LoaderResult<()> {
    match &input.target_netuids {
      Some(targets) if targets.is_empty() => {
        Err(LoaderError::InvalidData("target netuid list is empty".to_string()))
      }
      _ => Ok(()),
    }
  }

  fn name(&self) -> &'static str {
    "identity_loader"
  }
}
