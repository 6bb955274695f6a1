//! # 쇼핑 리스트 집계 서비스
//!
//! 사용자의 장바구니에 담긴 모든 레시피의 재료를 합산해 텍스트 리포트로 만듭니다.
//!
//! ## 집계 규칙
//! 1. 재료는 **이름**으로 묶습니다.
//! 2. 처음 만난 재료는 그 링크의 단위와 수량으로 시작하고,
//!    이후 같은 이름이 나오면 수량만 더합니다. 단위는 다시 확인하지 않습니다.
//!    (같은 이름에 다른 단위가 섞여 있어도 처음 본 단위를 유지합니다.)
//! 3. 줄 순서는 처음 만난 순서입니다. 정렬하지 않습니다.
//!
//! ```text
//! 레시피 A: 밀가루 200 g, 설탕 50 g
//! 레시피 B: 밀가루 100 g, 달걀 2 pcs
//! ────────────────────────────────
//! Flour (g) — 300
//! Sugar (g) — 50
//! Egg (pcs) — 2
//! ```

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::RecipeIngredient;

/// 다운로드되는 첨부 파일 이름
pub const FILENAME: &str = "shopping-list.txt";

/// 리포트의 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// 재료 이름 → 합계. 처음 추가된 순서를 보존합니다.
#[derive(Debug, Default)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
    /// 이름 → `items`의 인덱스
    positions: HashMap<String, usize>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 재료 링크 하나를 반영합니다.
    pub fn add(&mut self, name: &str, measurement_unit: &str, amount: i64) {
        match self.positions.get(name) {
            Some(&index) => {
                let item = &mut self.items[index];
                item.amount = item.amount.saturating_add(amount);
            }
            None => {
                self.positions.insert(name.to_string(), self.items.len());
                self.items.push(ShoppingListItem {
                    name: name.to_string(),
                    measurement_unit: measurement_unit.to_string(),
                    amount,
                });
            }
        }
    }

    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `"{name} ({unit}) — {amount}\n"` 형식의 줄을 이어 붙입니다.
    /// 빈 리스트는 빈 문자열입니다.
    pub fn render(&self) -> String {
        self.items
            .iter()
            .map(|item| {
                format!(
                    "{} ({}) — {}\n",
                    item.name, item.measurement_unit, item.amount
                )
            })
            .collect()
    }
}

impl FromIterator<RecipeIngredient> for ShoppingList {
    fn from_iter<I: IntoIterator<Item = RecipeIngredient>>(iter: I) -> Self {
        let mut list = ShoppingList::new();
        for line in iter {
            list.add(&line.name, &line.measurement_unit, line.amount);
        }
        list
    }
}

/// 사용자의 장바구니로 쇼핑 리스트 텍스트를 만듭니다.
///
/// 장바구니 → 레시피 → 재료 링크는 한 번의 쿼리로 읽습니다 (`db::shopping_cart_ingredients`).
pub async fn export(pool: &SqlitePool, user_id: &str) -> Result<String, AppError> {
    let lines = db::shopping_cart_ingredients(pool, user_id).await?;
    let list: ShoppingList = lines.into_iter().collect();

    tracing::debug!(
        "Shopping list for user {}: {} distinct ingredients",
        user_id,
        list.items().len()
    );

    Ok(list.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit: &str, amount: i64) -> RecipeIngredient {
        RecipeIngredient {
            id: name.to_lowercase(),
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn sums_shared_ingredients_in_first_seen_order() {
        // 레시피 A {Flour 200 g, Sugar 50 g}, 레시피 B {Flour 100 g, Egg 2 pcs}
        let list: ShoppingList = vec![
            line("Flour", "g", 200),
            line("Sugar", "g", 50),
            line("Flour", "g", 100),
            line("Egg", "pcs", 2),
        ]
        .into_iter()
        .collect();

        assert_eq!(list.items().len(), 3);
        assert_eq!(
            list.render(),
            "Flour (g) — 300\nSugar (g) — 50\nEgg (pcs) — 2\n"
        );
    }

    #[test]
    fn empty_cart_renders_empty_body() {
        let list: ShoppingList = Vec::new().into_iter().collect();
        assert!(list.is_empty());
        assert_eq!(list.render(), "");
    }

    #[test]
    fn first_seen_unit_wins_on_mismatch() {
        let list: ShoppingList = vec![line("Milk", "ml", 200), line("Milk", "cup", 1)]
            .into_iter()
            .collect();

        assert_eq!(
            list.items(),
            &[ShoppingListItem {
                name: "Milk".to_string(),
                measurement_unit: "ml".to_string(),
                amount: 201,
            }]
        );
    }

    #[test]
    fn one_line_per_distinct_name() {
        let mut list = ShoppingList::new();
        for (name, amount) in [("Salt", 1), ("Pepper", 2), ("Salt", 3), ("Oil", 4), ("Pepper", 5)] {
            list.add(name, "g", amount);
        }

        let rendered = list.render();
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.ends_with('\n'));
        assert_eq!(list.items()[0].amount, 4);
        assert_eq!(list.items()[1].amount, 7);
    }
}
