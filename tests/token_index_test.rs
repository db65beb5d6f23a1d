// ABOUTME: Integration tests for token index population and aggregate refresh
// ABOUTME: Covers rebuild idempotence, blob degradation and count consistency
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod common;

use anyhow::Result;
use common::{create_blob_corpus, create_line_corpus, SeededCorpus, TestRecipe};
use pantry_recipe_api::search::index::RebuildOutcome;
use sqlx::Row;
use std::collections::BTreeSet;

async fn token_set(corpus: &SeededCorpus) -> Result<BTreeSet<(i64, String)>> {
    let rows = sqlx::query("SELECT recipe_id, token FROM recipe_ing_tokens")
        .fetch_all(&corpus.pool)
        .await?;
    rows.iter()
        .map(|row| {
            Ok((
                row.try_get::<i64, _>("recipe_id")?,
                row.try_get::<String, _>("token")?,
            ))
        })
        .collect()
}

async fn count_for(corpus: &SeededCorpus, recipe_id: i64) -> Result<Option<i64>> {
    let row = sqlx::query("SELECT tok_total FROM recipe_token_counts WHERE recipe_id = ?")
        .bind(recipe_id)
        .fetch_optional(&corpus.pool)
        .await?;
    row.map(|r| r.try_get("tok_total").map_err(Into::into))
        .transpose()
}

#[tokio::test]
async fn test_build_populates_tokens_from_line_table() -> Result<()> {
    let corpus = create_line_corpus(&[TestRecipe {
        id: 1,
        name: "Garlic Chicken",
        lines: vec!["2 lbs chicken breast", "3 cloves garlic, minced"],
        ..Default::default()
    }])
    .await?;
    let (store, _engine, index) = corpus.setup().await?;

    let outcome = index.rebuild(&store).await?;
    assert_eq!(
        outcome,
        RebuildOutcome::Built {
            recipes: 1,
            tokens: 6
        }
    );

    let tokens = token_set(&corpus).await?;
    let expected: BTreeSet<(i64, String)> = ["lbs", "chicken", "breast", "cloves", "garlic", "minced"]
        .iter()
        .map(|t| (1, (*t).to_string()))
        .collect();
    assert_eq!(tokens, expected);
    assert_eq!(count_for(&corpus, 1).await?, Some(6));
    Ok(())
}

#[tokio::test]
async fn test_tokens_deduplicated_per_recipe() -> Result<()> {
    let corpus = create_line_corpus(&[TestRecipe {
        id: 1,
        name: "Double Garlic",
        lines: vec!["garlic", "more garlic", "garlic again"],
        ..Default::default()
    }])
    .await?;
    let (store, _engine, index) = corpus.setup().await?;
    index.rebuild(&store).await?;

    let garlic_rows: i64 =
        sqlx::query("SELECT COUNT(*) AS c FROM recipe_ing_tokens WHERE token = 'garlic'")
            .fetch_one(&corpus.pool)
            .await?
            .try_get("c")?;
    assert_eq!(garlic_rows, 1);
    assert_eq!(count_for(&corpus, 1).await?, Some(3)); // garlic, more, again
    Ok(())
}

#[tokio::test]
async fn test_rebuild_is_idempotent() -> Result<()> {
    let corpus = create_line_corpus(&[
        TestRecipe {
            id: 1,
            name: "Soup",
            lines: vec!["4 cups chicken broth", "1 onion"],
            ..Default::default()
        },
        TestRecipe {
            id: 2,
            name: "Salad",
            lines: vec!["lettuce", "olive oil"],
            ..Default::default()
        },
    ])
    .await?;
    let (store, _engine, index) = corpus.setup().await?;

    assert!(matches!(
        index.rebuild(&store).await?,
        RebuildOutcome::Built { recipes: 2, .. }
    ));
    let first = token_set(&corpus).await?;

    // Second run must not repopulate, only refresh the aggregate.
    assert_eq!(index.rebuild(&store).await?, RebuildOutcome::Refreshed);
    assert_eq!(token_set(&corpus).await?, first);
    assert_eq!(count_for(&corpus, 1).await?, Some(4));
    assert_eq!(count_for(&corpus, 2).await?, Some(3));

    // A from-scratch build over the same corpus lands on the same state.
    sqlx::query("DELETE FROM recipe_ing_tokens")
        .execute(&corpus.pool)
        .await?;
    assert!(matches!(
        index.rebuild(&store).await?,
        RebuildOutcome::Built { recipes: 2, .. }
    ));
    assert_eq!(token_set(&corpus).await?, first);
    assert_eq!(count_for(&corpus, 1).await?, Some(4));
    assert_eq!(count_for(&corpus, 2).await?, Some(3));
    Ok(())
}

#[tokio::test]
async fn test_refresh_recomputes_aggregate_from_tokens() -> Result<()> {
    let corpus = create_line_corpus(&[
        TestRecipe {
            id: 1,
            name: "A",
            lines: vec!["salt", "pepper"],
            ..Default::default()
        },
        TestRecipe {
            id: 2,
            name: "B",
            lines: vec!["sugar"],
            ..Default::default()
        },
    ])
    .await?;
    let (store, _engine, index) = corpus.setup().await?;
    index.rebuild(&store).await?;

    // Tamper with the token table; the aggregate must follow it on refresh.
    sqlx::query("DELETE FROM recipe_ing_tokens WHERE recipe_id = 2")
        .execute(&corpus.pool)
        .await?;
    assert_eq!(index.rebuild(&store).await?, RebuildOutcome::Refreshed);

    assert_eq!(count_for(&corpus, 1).await?, Some(2));
    assert_eq!(count_for(&corpus, 2).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_blob_corpus_parses_loose_arrays() -> Result<()> {
    let corpus = create_blob_corpus(&[TestRecipe {
        id: 1,
        name: "Pantry Pasta",
        ingredients_blob: Some("['dried pasta', 'olive oil', 'garlic']"),
        ..Default::default()
    }])
    .await?;
    let (store, _engine, index) = corpus.setup().await?;
    index.rebuild(&store).await?;

    let tokens: BTreeSet<String> = token_set(&corpus)
        .await?
        .into_iter()
        .map(|(_, t)| t)
        .collect();
    let expected: BTreeSet<String> = ["dried", "pasta", "olive", "oil", "garlic"]
        .iter()
        .map(|t| (*t).to_string())
        .collect();
    assert_eq!(tokens, expected);
    Ok(())
}

#[tokio::test]
async fn test_malformed_blob_degrades_to_splitting() -> Result<()> {
    // Not valid JSON even after the quote swap; naive splitting still yields
    // usable tokens rather than an indexing failure.
    let corpus = create_blob_corpus(&[
        TestRecipe {
            id: 1,
            name: "Scribbled Card",
            ingredients_blob: Some("flour; eggs, whole milk"),
            ..Default::default()
        },
        TestRecipe {
            id: 2,
            name: "Empty Card",
            ingredients_blob: None,
            ..Default::default()
        },
    ])
    .await?;
    let (store, _engine, index) = corpus.setup().await?;

    let outcome = index.rebuild(&store).await?;
    assert!(matches!(
        outcome,
        RebuildOutcome::Built { recipes: 2, .. }
    ));

    let tokens: BTreeSet<(i64, String)> = token_set(&corpus).await?;
    let expected: BTreeSet<(i64, String)> = ["flour", "eggs", "whole", "milk"]
        .iter()
        .map(|t| (1, (*t).to_string()))
        .collect();
    assert_eq!(tokens, expected);
    assert_eq!(count_for(&corpus, 2).await?, None);
    Ok(())
}
