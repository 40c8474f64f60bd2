use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, IntoStaticStr};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{MarketplaceError, MarketplaceResult};
use crate::ownership::Actor;
use crate::reviews::ReviewLog;
use crate::schema::{FieldDefault, FieldKind, FieldSpec, ListingSchema};

/// The three listing categories. Display gives the URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum ListingKind {
    #[strum(serialize = "consumer-products")]
    Consumer,
    #[strum(serialize = "lend-machines")]
    LendMachine,
    #[strum(serialize = "seed-products")]
    Seed,
}

impl ListingKind {
    /// URL segment under `/api`
    pub fn segment(&self) -> &'static str {
        self.into()
    }

    /// Human-readable name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Consumer => "Consumer product",
            Self::LendMachine => "Lend machine",
            Self::Seed => "Seed product",
        }
    }

    pub fn collection(&self) -> &'static str {
        match self {
            Self::Consumer => "consumer_products",
            Self::LendMachine => "lend_machines",
            Self::Seed => "seed_products",
        }
    }
}

/// Behaviour shared by every listing category.
///
/// Records are built and patched through their JSON form so the category
/// [`ListingSchema`] is the single place that decides which fields exist.
pub trait Listing:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + Unpin + 'static
{
    const KIND: ListingKind;
    const SCHEMA: ListingSchema;

    fn id(&self) -> Uuid;
    fn owner(&self) -> &str;
    fn reviews(&self) -> &ReviewLog;
    fn reviews_mut(&mut self) -> &mut ReviewLog;
    /// Bump `updated_at`
    fn touch(&mut self);

    /// New record owned by `owner` from schema-normalized fields.
    fn from_fields(owner: &Actor, mut fields: Map<String, Value>) -> MarketplaceResult<Self> {
        let now = serde_json::to_value(Utc::now())?;
        fields.insert("_id".into(), Value::String(Uuid::now_v7().to_string()));
        fields.insert("user".into(), Value::String(owner.id.clone()));
        fields.insert("created_at".into(), now.clone());
        fields.insert("updated_at".into(), now);

        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Overlay schema-normalized `changes` and bump `updated_at`.
    fn apply_changes(&mut self, changes: Map<String, Value>) -> MarketplaceResult<()> {
        let Value::Object(mut current) = serde_json::to_value(&*self)? else {
            return Err(MarketplaceError::Internal(format!(
                "{} did not serialize to an object",
                Self::KIND.label()
            )));
        };
        current.extend(changes);

        let mut updated: Self = serde_json::from_value(Value::Object(current))?;
        updated.touch();
        *self = updated;
        Ok(())
    }
}

/// Listing ids are stored as hyphenated strings in every encoding, so a
/// document written by the driver and a filter built with `doc!` agree.
pub mod listing_id {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id.as_hyphenated())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uuid::parse_str(&raw).map_err(de::Error::custom)
    }
}

macro_rules! impl_listing {
    ($ty:ty, $kind:expr, $fields:expr) => {
        impl Listing for $ty {
            const KIND: ListingKind = $kind;
            const SCHEMA: ListingSchema = ListingSchema::new($fields);

            fn id(&self) -> Uuid {
                self.id
            }

            fn owner(&self) -> &str {
                &self.user
            }

            fn reviews(&self) -> &ReviewLog {
                &self.reviews
            }

            fn reviews_mut(&mut self) -> &mut ReviewLog {
                &mut self.reviews
            }

            fn touch(&mut self) {
                self.updated_at = Utc::now();
            }
        }
    };
}

/// Produce sold by farmers directly to consumers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsumerProduct {
    #[serde(rename = "_id", alias = "id", with = "listing_id")]
    pub id: Uuid,
    /// Owner id
    pub user: String,
    #[schema(example = "Sample Product")]
    pub prod_name: String,
    pub seller_name: String,
    #[schema(example = "/images/sample.jpg")]
    pub image: String,
    pub price: f64,
    #[schema(example = "1kg")]
    pub prod_size: String,
    pub quantity: i64,
    #[schema(example = "Not specified")]
    pub available_location: String,
    #[serde(flatten)]
    pub reviews: ReviewLog,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const CONSUMER_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("prod_name", FieldKind::Text)
        .with_default(FieldDefault::Text("Sample Product")),
    FieldSpec::required("seller_name", FieldKind::Text).with_default(FieldDefault::ActorName),
    FieldSpec::required("image", FieldKind::Text)
        .with_default(FieldDefault::Text("/images/sample.jpg")),
    FieldSpec::required("price", FieldKind::Number).with_default(FieldDefault::Number(0.0)),
    FieldSpec::required("prod_size", FieldKind::Text).with_default(FieldDefault::Text("1kg")),
    FieldSpec::required("quantity", FieldKind::Integer).with_default(FieldDefault::Integer(0)),
    FieldSpec::required("available_location", FieldKind::Text)
        .with_default(FieldDefault::Text("Not specified"))
        .alias("avalaible_location"),
];

impl_listing!(ConsumerProduct, ListingKind::Consumer, CONSUMER_FIELDS);

/// Farm equipment offered for lending.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LendMachine {
    #[serde(rename = "_id", alias = "id", with = "listing_id")]
    pub id: Uuid,
    pub user: String,
    #[schema(example = "Tractor")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub description: String,
    #[schema(example = "Paddy")]
    pub target_plant: String,
    /// Lending price
    pub price: f64,
    pub quantity: i64,
    #[schema(example = "45 HP")]
    pub machine_power: String,
    #[serde(flatten)]
    pub reviews: ReviewLog,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const LEND_MACHINE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::Text),
    FieldSpec::optional("image", FieldKind::Text),
    FieldSpec::required("description", FieldKind::Text),
    FieldSpec::required("target_plant", FieldKind::Text),
    FieldSpec::required("price", FieldKind::Number),
    FieldSpec::required("quantity", FieldKind::Integer),
    FieldSpec::required("machine_power", FieldKind::Text),
];

impl_listing!(LendMachine, ListingKind::LendMachine, LEND_MACHINE_FIELDS);

/// Seed sold by a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeedProduct {
    #[serde(rename = "_id", alias = "id", with = "listing_id")]
    pub id: Uuid,
    pub user: String,
    #[schema(example = "Hybrid maize")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub description: String,
    #[schema(example = "Cereal")]
    pub category: String,
    pub price: f64,
    pub count_in_stock: i64,
    #[serde(flatten)]
    pub reviews: ReviewLog,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const SEED_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::Text),
    FieldSpec::optional("image", FieldKind::Text),
    FieldSpec::required("description", FieldKind::Text),
    FieldSpec::required("category", FieldKind::Text),
    FieldSpec::required("price", FieldKind::Number),
    FieldSpec::required("count_in_stock", FieldKind::Integer).alias("countInStock"),
];

impl_listing!(SeedProduct, ListingKind::Seed, SEED_FIELDS);

/// Body of `DELETE` and review responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Review added")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
