//! Read-only product catalog loaded from tab-separated resource files.
//!
//! - `product-groups.csv`: `id<TAB>name`
//! - `pg-<id>-products.csv`: `pid, pgid, title, price, author or director,
//!   year, country, genre or language`

use anyhow::{anyhow, Context, Result};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::debug;

pub const PRODUCT_FIELDS: usize = 8;

/// All eight columns of a product row, as stored.
pub type RawProduct = [String; PRODUCT_FIELDS];

/// `pid, pgid, title, price`, the listing view of a product.
pub type ProductSummary = [String; 4];

#[derive(Debug, Default)]
pub struct DomainDb {
    product_groups: BTreeMap<String, String>,
    products: BTreeMap<u32, Vec<RawProduct>>,
}

impl DomainDb {
    /// Load every product group and its products from `dir`.
    ///
    /// # Errors
    /// Returns an error if a file is missing, a row has the wrong number of
    /// columns, or a product group id is not numeric.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut product_groups = BTreeMap::new();
        for row in read_rows(&dir.join("product-groups.csv"))? {
            let [id, name]: [String; 2] = row
                .try_into()
                .map_err(|row: Vec<String>| anyhow!("product group row has {} columns", row.len()))?;
            product_groups.insert(id, name);
        }

        let mut products = BTreeMap::new();
        for id in product_groups.keys() {
            let pg_id: u32 = id
                .parse()
                .with_context(|| format!("Invalid product group id: {id}"))?;
            let path = dir.join(format!("pg-{pg_id}-products.csv"));
            let rows = read_rows(&path)?
                .into_iter()
                .map(|row| {
                    RawProduct::try_from(row).map_err(|row| {
                        anyhow!("{}: product row has {} columns", path.display(), row.len())
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            debug!(pg_id, count = rows.len(), "products loaded");
            products.insert(pg_id, rows);
        }

        Ok(Self {
            product_groups,
            products,
        })
    }

    #[must_use]
    pub fn product_groups(&self) -> &BTreeMap<String, String> {
        &self.product_groups
    }

    /// Listing of a product group, `None` if the group is unknown.
    #[must_use]
    pub fn products(&self, pg_id: u32) -> Option<Vec<ProductSummary>> {
        self.products.get(&pg_id).map(|rows| {
            rows.iter()
                .map(|[pid, pgid, title, price, ..]| {
                    [pid.clone(), pgid.clone(), title.clone(), price.clone()]
                })
                .collect()
        })
    }

    #[must_use]
    pub fn product(&self, pg_id: u32, p_id: u32) -> Option<&RawProduct> {
        let wanted = p_id.to_string();
        self.products
            .get(&pg_id)?
            .iter()
            .find(|product| product[0] == wanted)
    }
}

fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    Ok(text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect())
}
