//! 库存

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Insertable};
use crate::coded::{text_enum, Coded};
use crate::ids::InventoryItemId;
use crate::schema::{EntitySchema, INVENTORY};

text_enum! {
    /// 库存类别
    pub enum InventoryCategory {
        Medication => "medication",
        Equipment => "equipment",
        Supplies => "supplies",
    }
}

/// 库存记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub item_name: String,
    pub category: Coded<InventoryCategory>,
    pub quantity: i32,
    pub unit: Option<String>,
    /// 补货阈值，告警由外部计算
    pub reorder_level: Option<i32>,
    /// 单位：分
    pub cost: Option<i32>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// 新库存插入模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub item_name: String,
    pub category: Coded<InventoryCategory>,
    pub quantity: i32,
    pub unit: Option<String>,
    pub reorder_level: Option<i32>,
    pub cost: Option<i32>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

impl NewInventoryItem {
    pub fn new(item_name: impl Into<String>, category: InventoryCategory) -> Self {
        Self {
            item_name: item_name.into(),
            category: category.into(),
            quantity: 0,
            unit: None,
            reorder_level: None,
            cost: None,
            supplier: None,
            location: None,
            expiry_date: None,
        }
    }
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;
    type New = NewInventoryItem;

    const SCHEMA: &'static EntitySchema = &INVENTORY;

    fn id(&self) -> InventoryItemId {
        self.id
    }

    fn to_insertable(&self) -> NewInventoryItem {
        NewInventoryItem {
            item_name: self.item_name.clone(),
            category: self.category.clone(),
            quantity: self.quantity,
            unit: self.unit.clone(),
            reorder_level: self.reorder_level,
            cost: self.cost,
            supplier: self.supplier.clone(),
            location: self.location.clone(),
            expiry_date: self.expiry_date,
        }
    }
}

impl Insertable for NewInventoryItem {
    type Record = InventoryItem;

    fn into_record(self, id: InventoryItemId, _created_at: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            id,
            item_name: self.item_name,
            category: self.category,
            quantity: self.quantity,
            unit: self.unit,
            reorder_level: self.reorder_level,
            cost: self.cost,
            supplier: self.supplier,
            location: self.location,
            expiry_date: self.expiry_date,
        }
    }
}
