//! View state of one client "page": the data it shows moves through
//! `Idle -> Loading -> Loaded | Failed`, and a failed page may be loaded again.

use std::{fmt, future::Future};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a load is already in progress")]
    AlreadyLoading,
    #[error("page is already loaded")]
    AlreadyLoaded,
    #[error("no load in progress")]
    NotLoading,
}

impl<T> PageState<T> {
    /// Enter `Loading`. Allowed from `Idle`, and from `Failed` as a retry.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        match self {
            PageState::Idle | PageState::Failed(_) => {
                *self = PageState::Loading;
                Ok(())
            }
            PageState::Loading => Err(TransitionError::AlreadyLoading),
            PageState::Loaded(_) => Err(TransitionError::AlreadyLoaded),
        }
    }

    /// Settle a load with the fetch result.
    pub fn complete<E: fmt::Display>(&mut self, result: Result<T, E>) -> Result<(), TransitionError> {
        if !self.is_loading() {
            return Err(TransitionError::NotLoading);
        }
        *self = match result {
            Ok(data) => PageState::Loaded(data),
            Err(e) => PageState::Failed(e.to_string()),
        };
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn can_retry(&self) -> bool {
        matches!(self, PageState::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            PageState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            PageState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Run `fetch` once as a full `Loading -> Loaded | Failed` cycle.
    pub async fn load<E, F, Fut>(&mut self, fetch: F) -> Result<(), TransitionError>
    where
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.begin()?;
        let result = fetch().await;
        self.complete(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_to_loaded() {
        let mut page = PageState::<u32>::default();
        page.begin().unwrap();
        assert!(page.is_loading());
        page.complete(Ok::<_, String>(7)).unwrap();
        assert_eq!(page.data(), Some(&7));
        assert!(!page.can_retry());
    }

    #[test]
    fn failed_page_can_be_retried() {
        let mut page = PageState::<u32>::Idle;
        page.begin().unwrap();
        page.complete(Err::<u32, _>("Chapter not found")).unwrap();
        assert_eq!(page.error(), Some("Chapter not found"));
        assert!(page.can_retry());

        page.begin().unwrap();
        page.complete(Ok::<_, String>(1)).unwrap();
        assert_eq!(page.into_data(), Some(1));
    }

    #[test]
    fn transitions_only_happen_on_completion() {
        let mut page = PageState::<u32>::Idle;
        assert_eq!(
            page.complete(Ok::<_, String>(1)),
            Err(TransitionError::NotLoading)
        );
        page.begin().unwrap();
        assert_eq!(page.begin(), Err(TransitionError::AlreadyLoading));
        page.complete(Ok::<_, String>(1)).unwrap();
        assert_eq!(page.begin(), Err(TransitionError::AlreadyLoaded));
    }

    #[tokio::test]
    async fn load_runs_a_whole_cycle() {
        let mut page = PageState::<Vec<&str>>::Idle;
        page.load(|| async { Ok::<_, String>(vec!["intro"]) })
            .await
            .unwrap();
        assert_eq!(page.data().map(Vec::len), Some(1));

        let mut failing = PageState::<u32>::Idle;
        failing
            .load(|| async { Err::<u32, _>("connection refused") })
            .await
            .unwrap();
        assert!(failing.can_retry());
    }
}
