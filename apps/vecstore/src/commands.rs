use std::io::{BufRead, Write};

use domain_vector::{
    ColumnarBatch, RequestContext, ScoredMetadata, VectorEngine, VectorParams, VectorStoreClient,
};
use eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::info;

use crate::cli::Command;

/// One line of an upsert file
#[derive(Debug, Deserialize)]
struct UpsertLine {
    id: u64,
    vector: Vec<f32>,
    metadata: serde_json::Value,
}

/// Run one subcommand, writing its output to `out`
pub async fn execute<E, W>(
    client: &VectorStoreClient<E>,
    ctx: &RequestContext,
    command: Command,
    out: &mut W,
) -> Result<()>
where
    E: VectorEngine,
    W: Write,
{
    match command {
        Command::Collections => {
            let names = client
                .list_collections(ctx)
                .await
                .wrap_err("Failed to list collections")?;
            for name in names {
                writeln!(out, "{}", name)?;
            }
        }
        Command::Exists { collection } => {
            let exists = client
                .collection_exists(ctx, &collection)
                .await
                .wrap_err_with(|| format!("Failed to check collection '{}'", collection))?;
            writeln!(out, "{}", exists)?;
        }
        Command::Create {
            collection,
            dim,
            distance,
        } => {
            let created = match distance {
                Some(distance) => {
                    let params = VectorParams::new(dim).with_distance(distance);
                    client.create_collection_with(ctx, &collection, params).await
                }
                None => client.create_collection(ctx, &collection, dim).await,
            };
            created.wrap_err_with(|| format!("Failed to create collection '{}'", collection))?;
            info!(%collection, dim, "Collection created");
        }
        Command::PointExists { collection, id } => {
            let exists = client
                .point_exists(ctx, &collection, id)
                .await
                .wrap_err_with(|| format!("Failed to look up point {} in '{}'", id, collection))?;
            writeln!(out, "{}", exists)?;
        }
        Command::Upsert { collection, file } => {
            let reader = std::fs::File::open(&file)
                .map(std::io::BufReader::new)
                .wrap_err_with(|| format!("Failed to open {}", file.display()))?;
            let batch = read_batch(reader)
                .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
            let points = batch.len();

            client
                .upsert_batch(ctx, &collection, batch)
                .await
                .wrap_err_with(|| format!("Failed to upsert into '{}'", collection))?;
            info!(%collection, points, "Points upserted");
        }
        Command::Search {
            collection,
            vector,
            limit,
            scores,
        } => {
            if scores {
                let hits = client
                    .search_scored(ctx, &collection, vector, limit)
                    .await
                    .wrap_err_with(|| format!("Failed to search '{}'", collection))?;
                write_scored(out, &hits)?;
            } else {
                let hits = client
                    .search(ctx, &collection, vector, limit)
                    .await
                    .wrap_err_with(|| format!("Failed to search '{}'", collection))?;
                for metadata in hits {
                    writeln!(out, "{}", metadata)?;
                }
            }
        }
    }

    Ok(())
}

/// Parse JSON Lines into one columnar batch; blank lines are ignored
fn read_batch(reader: impl BufRead) -> Result<ColumnarBatch> {
    let mut ids = Vec::new();
    let mut embeddings = Vec::new();
    let mut metadata = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: UpsertLine = serde_json::from_str(&line)
            .wrap_err_with(|| format!("Invalid record on line {}", index + 1))?;

        ids.push(parsed.id);
        embeddings.push(parsed.vector);
        metadata.push(match parsed.metadata {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
    }

    Ok(ColumnarBatch::new(ids, embeddings, metadata)?)
}

fn write_scored(out: &mut impl Write, hits: &[ScoredMetadata]) -> Result<()> {
    for hit in hits {
        writeln!(out, "{}", serde_json::to_string(hit)?)?;
    }
    Ok(())
}
