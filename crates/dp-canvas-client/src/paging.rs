//! Pagination driver: follow `next` relations until the collection is drained

use std::future::Future;

use dp_canvas_api::Page;
use url::Url;

/// Accumulate every record of a paginated collection, starting from an
/// already-fetched first page and calling `fetch` for each `next` target.
///
/// The return shape is normalized: callers always receive the full `Vec`,
/// whether the collection spanned one page or many. Any fetch failure
/// mid-stream fails the whole operation; no partial result is returned.
pub async fn drain_pages<T, E, F, Fut>(first: Page<T>, mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = first.items;
    let mut next = first.links.next;
    while let Some(url) = next {
        let page = fetch(url).await?;
        items.extend(page.items);
        next = page.links.next;
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dp_canvas_api::PageLinks;

    fn linked_pages(per_page: usize, total: usize) -> Vec<Page<usize>> {
        let page_count = total.div_ceil(per_page).max(1);
        (0..page_count)
            .map(|p| {
                let items: Vec<usize> =
                    (p * per_page..((p + 1) * per_page).min(total)).collect();
                let next = if p + 1 < page_count {
                    Some(
                        Url::parse(&format!("https://canvas.example.com/x?page={}", p + 2))
                            .unwrap(),
                    )
                } else {
                    None
                };
                Page {
                    items,
                    links: PageLinks {
                        next,
                        ..PageLinks::default()
                    },
                }
            })
            .collect()
    }

    async fn drain_synthetic(per_page: usize, total: usize) -> Vec<usize> {
        let mut pages = linked_pages(per_page, total);
        let first = pages.remove(0);
        let mut remaining = pages.into_iter();
        drain_pages(first, |_url| {
            let page = remaining.next().expect("fetch past the last page");
            async move { Ok::<_, std::convert::Infallible>(page) }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn single_unpaginated_page_returns_all_records() {
        let records = drain_synthetic(10, 7).await;
        assert_eq!(records, (0..7).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn multi_page_collection_is_accumulated_in_order() {
        for pages in 1..=5 {
            let total = pages * 3;
            let records = drain_synthetic(3, total).await;
            assert_eq!(records, (0..total).collect::<Vec<_>>(), "P={pages}");
        }
    }

    #[tokio::test]
    async fn ragged_last_page_is_included() {
        let records = drain_synthetic(4, 10).await;
        assert_eq!(records.len(), 10);
        assert_eq!(records[9], 9);
    }

    #[tokio::test]
    async fn mid_stream_failure_fails_the_whole_operation() {
        let mut pages = linked_pages(2, 6);
        let first = pages.remove(0);
        let result: Result<Vec<usize>, &str> =
            drain_pages(first, |_url| async { Err("boom") }).await;
        assert_eq!(result.unwrap_err(), "boom");
    }
}
