use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::domain::{Album, Artist, Song};
use crate::ports::{RepoError, Searchable};
use crate::search::{
  AlbumDto, ArtistDto, Pagination, SearchFailure, SearchItems, SearchKind, SearchOutcome, SearchQuery,
  SearchResult, SearchSection, SongDto,
};

type Branch = BoxFuture<'static, Result<(SearchItems, u64), RepoError>>;

/// Agregador de búsqueda multi-dominio.
///
/// Lanza una tarea por cada tipo pedido, espera a todas (barrera) y junta lo
/// que haya salido bien. Una rama que falla no tumba la búsqueda: su clave
/// simplemente no aparece en el resultado.
pub struct SearchService {
  artists: Arc<dyn Searchable<Artist>>,
  albums: Arc<dyn Searchable<Album>>,
  songs: Arc<dyn Searchable<Song>>,
  timeout: Option<Duration>,
}

impl SearchService {
  pub fn new(
    artists: Arc<dyn Searchable<Artist>>,
    albums: Arc<dyn Searchable<Album>>,
    songs: Arc<dyn Searchable<Song>>,
  ) -> Self {
    Self { artists, albums, songs, timeout: None }
  }

  /// Plazo por rama. Una rama que lo supera cuenta como fallo del proveedor.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  /// Los parámetros se asumen validados por el llamador (ver [`SearchQuery::new`]).
  pub async fn search<I>(&self, types: I, query: &str, limit: u32, offset: u32) -> SearchResult
  where
    I: IntoIterator<Item = SearchKind>,
  {
    self.search_with_diagnostics(types, query, limit, offset).await.result
  }

  pub async fn search_query(&self, query: &SearchQuery) -> SearchOutcome {
    self.search_with_diagnostics(query.types.iter().copied(), &query.text, query.limit, query.offset).await
  }

  /// Igual que [`search`](Self::search), pero además devuelve el motivo de cada rama fallida.
  pub async fn search_with_diagnostics<I>(&self, types: I, query: &str, limit: u32, offset: u32) -> SearchOutcome
  where
    I: IntoIterator<Item = SearchKind>,
  {
    // Un tipo repetido no lanza dos ramas.
    let kinds: BTreeSet<SearchKind> = types.into_iter().collect();
    let outcome = Arc::new(Mutex::new(SearchOutcome::default()));
    let query: Arc<str> = Arc::from(query);

    let mut handles = Vec::with_capacity(kinds.len());

    for kind in kinds {
      let branch = self.branch(kind, Arc::clone(&query), limit, offset);
      let outcome = Arc::clone(&outcome);
      let deadline = self.timeout;

      let handle = tokio::spawn(async move {
        let res = match deadline {
          Some(d) => match tokio::time::timeout(d, branch).await {
            Ok(res) => res.map_err(|e| SearchFailure::Provider(e.to_string())),
            Err(_) => Err(SearchFailure::Timeout(d)),
          },
          None => branch.await.map_err(|e| SearchFailure::Provider(e.to_string())),
        };

        record(&outcome, kind, res, limit, offset);
      });
      handles.push((kind, handle));
    }

    // Barrera: no se devuelve nada hasta que todas las ramas terminaron.
    for (kind, handle) in handles {
      if let Err(e) = handle.await {
        record(&outcome, kind, Err(SearchFailure::Aborted(e.to_string())), limit, offset);
      }
    }

    let mut guard = outcome.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::take(&mut *guard)
  }

  fn branch(&self, kind: SearchKind, query: Arc<str>, limit: u32, offset: u32) -> Branch {
    match kind {
      SearchKind::Artist => {
        let provider = Arc::clone(&self.artists);
        async move {
          let page = provider.search(&query, limit, offset).await?;
          let items = page.items.into_iter().map(ArtistDto::from).collect();
          Ok((SearchItems::Artists(items), page.total))
        }
        .boxed()
      }
      SearchKind::Album => {
        let provider = Arc::clone(&self.albums);
        async move {
          let page = provider.search(&query, limit, offset).await?;
          let items = page.items.into_iter().map(AlbumDto::from).collect();
          Ok((SearchItems::Albums(items), page.total))
        }
        .boxed()
      }
      SearchKind::Song => {
        let provider = Arc::clone(&self.songs);
        async move {
          let page = provider.search(&query, limit, offset).await?;
          let items = page.items.into_iter().map(SongDto::from).collect();
          Ok((SearchItems::Songs(items), page.total))
        }
        .boxed()
      }
    }
  }
}

/// Única sección crítica: el candado se toma solo para insertar.
fn record(
  outcome: &Mutex<SearchOutcome>,
  kind: SearchKind,
  res: Result<(SearchItems, u64), SearchFailure>,
  limit: u32,
  offset: u32,
) {
  let mut guard = outcome.lock().unwrap_or_else(PoisonError::into_inner);

  match res {
    Ok((items, total)) => {
      debug!(%kind, total, returned = items.len(), "search branch completed");
      let section = SearchSection { items, pagination: Pagination { limit, offset, total } };
      guard.result.insert(kind, section);
    }
    Err(failure) => {
      warn!(%kind, error = %failure, "search branch failed, omitting it from the result");
      guard.failures.insert(kind, failure);
    }
  }
}
