use async_trait::async_trait;

use crate::ports::RepoError;

/// Una página de resultados tal como la devuelve un proveedor.
///
/// `total` cuenta todas las coincidencias, no solo las de esta página.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: u64,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, total: u64) -> Self {
    Self { items, total }
  }
}

/// Port de búsqueda por texto sobre un tipo de entidad.
///
/// Al agregador solo le importa esta firma; cómo se obtienen los datos
/// (SQL, índice externo, memoria) es cosa del adapter.
#[async_trait]
pub trait Searchable<T>: Send + Sync {
  async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<Page<T>, RepoError>;
}
