use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::links::LinkEntry;
use crate::session::ConversationState;
use crate::settings::Settings;
use tracing::info;

/// PDF attachments linked from a notice page.
///
/// `Ok` with an empty list means the page has no PDF links; a page that could
/// not be retrieved is an `Err`.
pub async fn find_pdfs(
    fetcher: &Fetcher,
    settings: &Settings,
    page_url: &str,
) -> Result<Vec<LinkEntry>> {
    let page_url = page_url.trim();
    if page_url.is_empty() {
        return Err(Error::InvalidInput("enter a notice page URL".into()));
    }

    let extractor = settings.link_extractor(page_url)?;
    let html = fetcher.fetch_page(page_url).await?;
    let links = extractor.extract(&html);

    info!("Found {} PDF links on {}", links.len(), page_url);
    Ok(links)
}

/// Download and parse a PDF, then make it the session's document.
///
/// On failure the session keeps its previous document and history.
pub async fn open_pdf(
    fetcher: &Fetcher,
    state: &mut ConversationState,
    entry: &LinkEntry,
) -> Result<()> {
    info!(session = %state.id(), "Opening '{}' from {}", entry.label(), entry.url());
    let text = fetcher.fetch_document_text(entry.url()).await?;
    state.load_document(text, entry.label());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, ParseError};
    use crate::fetch::DEFAULT_USER_AGENT;
    use crate::test_support::{pdf_with_pages, serve, Route};

    fn fetcher() -> Fetcher {
        Fetcher::new(DEFAULT_USER_AGENT).unwrap()
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let err = find_pdfs(&fetcher(), &Settings::default(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_malformed_url_is_parse_error() {
        let err = find_pdfs(&fetcher(), &Settings::default(), "kw.ac.kr/notice")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_page_is_fetch_error_not_empty() {
        let err = find_pdfs(&fetcher(), &Settings::default(), "http://127.0.0.1:9/notice")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[tokio::test]
    async fn test_failed_open_keeps_previous_document() {
        let mut state = ConversationState::new();
        state.load_document("old text", "Old notice");
        state.append_exchange("q", "a").unwrap();

        let entry = LinkEntry::new("New notice", "http://127.0.0.1:9/new.pdf");
        let err = open_pdf(&fetcher(), &mut state, &entry).await.unwrap_err();

        assert!(matches!(err, Error::Fetch(_)));
        assert_eq!(state.document_label(), Some("Old notice"));
        assert_eq!(state.document_text(), Some("old text"));
        assert_eq!(state.history().len(), 3);
    }

    const NOTICE_HTML: &str = r#"<a href="/a/b.pdf">Notice 1</a><a href="c.pdf">Notice 2</a><a href="x.html">Other</a>"#;

    #[tokio::test]
    async fn test_served_page_links_found() {
        let base = serve(vec![Route::html("/notice", NOTICE_HTML)]).await;

        let links = find_pdfs(&Fetcher::direct(), &Settings::default(), &format!("{}/notice", base))
            .await
            .unwrap();
        assert_eq!(
            links,
            vec![
                LinkEntry::new("Notice 1", format!("{}/a/b.pdf", base)),
                LinkEntry::new("Notice 2", format!("{}/kw_service/c.pdf", base)),
            ]
        );
    }

    #[tokio::test]
    async fn test_served_page_without_pdfs_is_empty() {
        let html = r#"<p>No attachments</p><a href="x.html">Other</a>"#;
        let base = serve(vec![Route::html("/notice", html)]).await;

        let links = find_pdfs(&Fetcher::direct(), &Settings::default(), &format!("{}/notice", base))
            .await
            .unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_missing_page_is_error_not_empty() {
        let base = serve(vec![]).await;
        let err = find_pdfs(&Fetcher::direct(), &Settings::default(), &format!("{}/notice", base))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Fetch(FetchError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_open_served_pdf_loads_document() {
        let pdf = pdf_with_pages(&["Deadline March 1", "Submit by email"]);
        let base = serve(vec![
            Route::html("/notice", NOTICE_HTML),
            Route::pdf("/a/b.pdf", pdf),
        ])
        .await;
        let fetcher = Fetcher::direct();

        let links = find_pdfs(&fetcher, &Settings::default(), &format!("{}/notice", base))
            .await
            .unwrap();
        let mut state = ConversationState::new();
        open_pdf(&fetcher, &mut state, &links[0]).await.unwrap();

        assert_eq!(state.document_label(), Some("Notice 1"));
        assert!(state.document_text().unwrap().contains("Deadline March 1"));
        assert_eq!(state.history().len(), 1);
    }
}
