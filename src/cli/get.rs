//! Get command - resolve one entity through the cache

use anyhow::Context;
use clap::Args;
use serde_json::Value;
use uuid::Uuid;

use crate::Runtime;
use crate::domain::{
    CodeSystem, Concept, ConceptClass, ConceptName, ConceptReferenceTerm, ConceptRelationship,
    ConceptSet, ConceptSetMember, PhoneticAlgorithm, ReferenceTerm, Resource, ResourceKind,
};
use crate::infrastructure::resolution::EntityResolutionProvider;

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Entity kind, e.g. `concept` or `concept-set`
    pub kind: ResourceKind,

    /// Entity id
    pub id: Uuid,

    /// Specific version id
    #[arg(long)]
    pub version: Option<Uuid>,
}

pub async fn run(args: GetArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let runtime = Runtime::from_config(config)?;
    let provider = runtime.resolver().await?;

    let found = match args.kind {
        ResourceKind::Concept => fetch::<Concept>(&provider, &args).await?,
        ResourceKind::ConceptSet => fetch::<ConceptSet>(&provider, &args).await?,
        ResourceKind::ConceptClass => fetch::<ConceptClass>(&provider, &args).await?,
        ResourceKind::ConceptName => fetch::<ConceptName>(&provider, &args).await?,
        ResourceKind::ConceptReferenceTerm => {
            fetch::<ConceptReferenceTerm>(&provider, &args).await?
        }
        ResourceKind::ConceptRelationship => fetch::<ConceptRelationship>(&provider, &args).await?,
        ResourceKind::ConceptSetMember => fetch::<ConceptSetMember>(&provider, &args).await?,
        ResourceKind::ReferenceTerm => fetch::<ReferenceTerm>(&provider, &args).await?,
        ResourceKind::CodeSystem => fetch::<CodeSystem>(&provider, &args).await?,
        ResourceKind::PhoneticAlgorithm => fetch::<PhoneticAlgorithm>(&provider, &args).await?,
    };

    match found {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => anyhow::bail!("{} {} not found", args.kind, args.id),
    }

    Ok(())
}

async fn fetch<T: Resource>(
    provider: &EntityResolutionProvider,
    args: &GetArgs,
) -> anyhow::Result<Option<Value>> {
    let entity = provider
        .try_get::<T>(args.id, args.version)
        .await
        .with_context(|| format!("Failed to resolve {} {}", args.kind, args.id))?;

    entity
        .map(|entity| serde_json::to_value(entity).context("Failed to encode entity"))
        .transpose()
}
