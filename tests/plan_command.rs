use std::path::PathBuf;

use plateplan::Config;
use plateplan::cli::{PlanArgs, generate_plan};
use plateplan_mealplan::{FilterTier, TimeFrame};
use serde_json::json;
use temp_dir::TempDir;

fn write_catalog(dir: &TempDir) -> anyhow::Result<PathBuf> {
    let dish_types = ["breakfast", "main course", "dinner", "snack"];
    let recipes = (1..=40)
        .map(|id: u64| {
            json!({
                "id": id,
                "title": format!("Recipe {id}"),
                "readyInMinutes": 10 + id % 40,
                "servings": 2,
                "dishTypes": [dish_types[(id % 4) as usize]],
                "diets": if id % 2 == 0 { vec!["vegetarian"] } else { vec![] },
                "nutrition": {
                    "nutrients": [
                        { "name": "Calories", "amount": 250 + id * 10, "unit": "kcal" },
                        { "name": "Protein", "amount": 15, "unit": "g" }
                    ]
                }
            })
        })
        .collect::<Vec<_>>();

    let path = dir.child("catalog.json");
    std::fs::write(&path, serde_json::to_string(&json!({ "results": recipes }))?)?;

    Ok(path)
}

#[tokio::test]
async fn test_plan_from_catalog_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let args = PlanArgs {
        catalog: Some(write_catalog(&dir)?),
        time_frame: Some(TimeFrame::Week),
        date: Some("2025-06-01".to_owned()),
        seed: Some(42),
        ..Default::default()
    };

    let plan = generate_plan(&Config::default(), &args).await?;

    assert_eq!(plan.days.len(), 7);
    assert_eq!(plan.selections.len(), 21);
    assert_eq!(plan.skipped_slots, 0);
    assert_eq!(plan.nutrition.protein, 21.0 * 15.0);

    Ok(())
}

#[tokio::test]
async fn test_flags_override_request_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let request = dir.child("request.json");
    std::fs::write(
        &request,
        r#"{ "timeFrame": "week", "diet": "vegetarian", "preferences": { "mealCount": 4 } }"#,
    )?;
    let args = PlanArgs {
        request: Some(request),
        catalog: Some(write_catalog(&dir)?),
        time_frame: Some(TimeFrame::Day),
        date: Some("2025-06-01".to_owned()),
        seed: Some(1),
        ..Default::default()
    };

    let parsed = args.to_request()?;
    assert_eq!(parsed.time_frame, TimeFrame::Day);
    assert_eq!(parsed.diet.as_deref(), Some("vegetarian"));
    assert_eq!(parsed.preferences.meal_count, Some(4));

    let plan = generate_plan(&Config::default(), &args).await?;

    assert_eq!(plan.days.len(), 1);
    assert_eq!(plan.days[0].meals.len(), 4);
    assert_eq!(plan.filter_tier, FilterTier::Strict);
    for meal in &plan.selections {
        assert_eq!(meal.recipe.id % 2, 0, "{} is not vegetarian", meal.recipe.title);
    }

    Ok(())
}

#[tokio::test]
async fn test_missing_api_key_without_catalog_file() {
    let args = PlanArgs::default();

    let result = generate_plan(&Config::default(), &args).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_invalid_request_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let request = dir.child("request.json");
    std::fs::write(&request, r#"{ "timeFrame": "fortnight" }"#)?;
    let args = PlanArgs {
        request: Some(request),
        ..Default::default()
    };

    assert!(args.to_request().is_err());

    Ok(())
}
