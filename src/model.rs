use serde::{Deserialize, Serialize};

/// Summary of a recipe as returned by the paged listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub cuisine: Option<String>,
    #[serde(rename = "mealType")]
    pub meal_type: Option<Vec<String>>,
    pub difficulty: Option<String>,
}

/// Full recipe as returned by the by-id endpoint.
///
/// Field names follow the upstream API's camelCase JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub cuisine: Option<String>,
    pub meal_type: Option<Vec<String>>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub calories_per_serving: Option<u32>,
    pub rating: Option<f32>,
    pub review_count: Option<u32>,
    pub user_id: Option<u64>,
}

/// One page of a server-side result set plus its paging metadata.
///
/// The metadata fields are optional upstream; absent values deserialize to 0.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePage {
    #[serde(default)]
    pub recipes: Vec<RecipeSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}
