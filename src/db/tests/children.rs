use super::*;

async fn recipe_with_owner(db: &Database) -> RecipeId {
    let owner = test_user(db).await;
    insert_recipe(db, &new_recipe(owner, Source::Edamam, Some("abc123")))
        .await
        .unwrap()
}

fn ingredient(name: &str, position: i64) -> NewIngredient {
    NewIngredient {
        name: name.to_string(),
        quantity: Some("1.0".to_string()),
        unit: None,
        position,
    }
}

#[tokio::test]
async fn test_ingredients_are_listed_by_position() {
    let (db, _temp_file) = test_db().await;
    let id = recipe_with_owner(&db).await;

    let mut tx = db.begin_write().await.unwrap();
    let inserted = tx
        .insert_ingredients(id, &[ingredient("salt", 2), ingredient("oil", 0), ingredient("garlic", 1)])
        .await
        .unwrap();
    tx.commit().await.unwrap();
    assert_eq!(inserted, 3);

    let names: Vec<String> = db
        .list_ingredients(id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["oil", "garlic", "salt"]);
}

#[tokio::test]
async fn test_second_population_inserts_nothing() {
    let (db, _temp_file) = test_db().await;
    let id = recipe_with_owner(&db).await;
    let ingredients = [ingredient("oil", 0), ingredient("salt", 1)];

    for expected in [2, 0] {
        let mut tx = db.begin_write().await.unwrap();
        assert_eq!(tx.insert_ingredients(id, &ingredients).await.unwrap(), expected);
        assert_eq!(tx.insert_steps(id, &steps(&["a", "b"])).await.unwrap(), expected);
        tx.commit().await.unwrap();
    }

    assert_eq!(db.count_ingredients(id).await.unwrap(), 2);
    assert_eq!(db.count_steps(id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_replace_steps_removes_previous_steps() {
    let (db, _temp_file) = test_db().await;
    let id = recipe_with_owner(&db).await;

    assert_eq!(db.replace_steps(id, &steps(&["A", "B"])).await.unwrap(), 2);
    assert_eq!(db.replace_steps(id, &steps(&["C"])).await.unwrap(), 1);

    let remaining = db.list_steps(id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].content, "C");
    assert_eq!(remaining[0].step_number, 1);

    assert_eq!(db.replace_steps(id, &[]).await.unwrap(), 0);
    assert!(db.list_steps(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_populate_steps_only_when_empty() {
    let (db, _temp_file) = test_db().await;
    let id = recipe_with_owner(&db).await;

    assert_eq!(db.populate_steps_if_empty(id, &steps(&["first"])).await.unwrap(), 1);
    assert_eq!(
        db.populate_steps_if_empty(id, &steps(&["x", "y"])).await.unwrap(),
        0
    );

    let stored = db.list_steps(id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].content, "first");
}

#[tokio::test]
async fn test_large_batches_are_chunked() {
    let (db, _temp_file) = test_db().await;
    let id = recipe_with_owner(&db).await;

    let many: Vec<NewIngredient> = (0..450).map(|i| ingredient(&format!("item {i}"), i)).collect();
    let contents: Vec<String> = (0..600).map(|i| format!("step {i}")).collect();
    let content_refs: Vec<&str> = contents.iter().map(String::as_str).collect();

    let mut tx = db.begin_write().await.unwrap();
    assert_eq!(tx.insert_ingredients(id, &many).await.unwrap(), 450);
    assert_eq!(tx.insert_steps(id, &steps(&content_refs)).await.unwrap(), 600);
    tx.commit().await.unwrap();

    assert_eq!(db.count_ingredients(id).await.unwrap(), 450);
    assert_eq!(db.count_steps(id).await.unwrap(), 600);
}

#[tokio::test]
async fn test_deleting_recipe_cascades_to_children() {
    let (db, _temp_file) = test_db().await;
    let id = recipe_with_owner(&db).await;

    let mut tx = db.begin_write().await.unwrap();
    tx.insert_ingredients(id, &[ingredient("oil", 0)]).await.unwrap();
    tx.insert_steps(id, &steps(&["a"])).await.unwrap();
    tx.commit().await.unwrap();

    sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await
        .unwrap();

    assert_eq!(db.count_ingredients(id).await.unwrap(), 0);
    assert_eq!(db.count_steps(id).await.unwrap(), 0);
}
