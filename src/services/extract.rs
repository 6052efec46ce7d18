// src/services/extract.rs

//! Board markup extractors.
//!
//! Each supported page layout has one [`Extractor`] turning a page body into
//! candidate items in document order. Extractors never fetch anything.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Item, MarkupKind};
use crate::utils::{clean_text, resolve_url};

/// Turns one page body into candidate items.
pub trait Extractor: Send + Sync {
    /// Extract `(title, link)` items; relative links resolve against `base`.
    fn extract(&self, body: &str, base: &Url) -> Result<Vec<Item>>;
}

/// Return the extractor for a markup shape.
pub fn extractor_for(kind: MarkupKind) -> Box<dyn Extractor> {
    match kind {
        MarkupKind::InfocomSubject => Box::new(InfocomExtractor),
        MarkupKind::ScatchNotice => Box::new(ScatchExtractor),
        MarkupKind::DisuTable => Box::new(DisuExtractor),
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

/// Resolve the `href` of an anchor, or an empty link when there is none.
fn anchor_link(anchor: Option<ElementRef<'_>>, base: &Url) -> String {
    anchor
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| resolve_url(base, href))
        .unwrap_or_default()
}

/// infocom.ssu.ac.kr undergraduate and graduate boards.
///
/// Every post is a `div.subject.on` whose first `span` holds the title; the
/// whole row is wrapped in the post's `<a>`.
pub struct InfocomExtractor;

impl Extractor for InfocomExtractor {
    fn extract(&self, body: &str, base: &Url) -> Result<Vec<Item>> {
        let document = Html::parse_document(body);
        let post_sel = parse_selector("div.subject.on")?;
        let title_sel = parse_selector("span")?;

        let items = document
            .select(&post_sel)
            .map(|post| {
                let title = post
                    .select(&title_sel)
                    .next()
                    .map(element_text)
                    .unwrap_or_default();
                let anchor = post
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .find(|el| el.value().name() == "a");
                Item::new(title, anchor_link(anchor, base))
            })
            .collect();
        Ok(items)
    }
}

/// scatch.ssu.ac.kr notice list.
pub struct ScatchExtractor;

impl Extractor for ScatchExtractor {
    fn extract(&self, body: &str, base: &Url) -> Result<Vec<Item>> {
        let document = Html::parse_document(body);
        let post_sel = parse_selector("div.notice_col3")?;
        // "blcok" is the class name the site actually uses
        let title_sel = parse_selector("span.d-inline-blcok.m-pt-5")?;
        let link_sel = parse_selector("a")?;

        let items = document
            .select(&post_sel)
            .map(|post| {
                let title = post
                    .select(&title_sel)
                    .next()
                    .map(element_text)
                    .unwrap_or_default();
                Item::new(title, anchor_link(post.select(&link_sel).next(), base))
            })
            .collect();
        Ok(items)
    }
}

/// disu.ac.kr community notice table.
///
/// Rows without a title cell (headers, spacers) are skipped. The mobile-only
/// category label is prefixed to the title.
pub struct DisuExtractor;

impl Extractor for DisuExtractor {
    fn extract(&self, body: &str, base: &Url) -> Result<Vec<Item>> {
        let document = Html::parse_document(body);
        let row_sel = parse_selector("#zcmsprogram > div > table > tbody > tr")?;
        let cell_sel = parse_selector("td.title.noti-tit")?;
        let category_sel = parse_selector("span.hidden-md-up")?;
        let link_sel = parse_selector("a")?;

        let mut items = Vec::new();
        for row in document.select(&row_sel) {
            let Some(cell) = row.select(&cell_sel).next() else {
                continue;
            };
            let anchor = cell.select(&link_sel).next();
            let title = match anchor {
                Some(a) => {
                    let category = cell
                        .select(&category_sel)
                        .next()
                        .map(element_text)
                        .unwrap_or_default();
                    clean_text(&format!("{category} {}", element_text(a)))
                }
                None => String::new(),
            };
            items.push(Item::new(title, anchor_link(anchor, base)));
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    const INFOCOM_PAGE: &str = r#"
        <html><body><ul class="list">
          <li><a href="/kor/notice/view.php?idx=201">
            <div class="subject on"><span>[학사] 2학기 수강신청 안내</span><em>new</em></div>
          </a></li>
          <li><a href="http://infocom.ssu.ac.kr/kor/notice/view.php?idx=200">
            <div class="subject on"><span>
                졸업시험 일정
            </span></div>
          </a></li>
          <li><div class="subject on"><span>링크 없는 글</span></div></li>
          <li><a href="/kor/notice/view.php?idx=199"><div class="subject"><span>비활성</span></div></a></li>
        </ul></body></html>
    "#;

    #[test]
    fn test_infocom_extracts_in_document_order() {
        let items = InfocomExtractor
            .extract(
                INFOCOM_PAGE,
                &base("http://infocom.ssu.ac.kr/kor/notice/undergraduate.php"),
            )
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "[학사] 2학기 수강신청 안내");
        assert_eq!(
            items[0].link,
            "http://infocom.ssu.ac.kr/kor/notice/view.php?idx=201"
        );
        assert_eq!(items[1].title, "졸업시험 일정");
        assert_eq!(
            items[1].link,
            "http://infocom.ssu.ac.kr/kor/notice/view.php?idx=200"
        );
        assert_eq!(items[2].title, "링크 없는 글");
        assert!(items[2].link.is_empty());
    }

    #[test]
    fn test_scatch_extracts_title_and_link() {
        let page = r#"
            <div class="notice-lists">
              <div class="notice_col3">
                <a href="https://scatch.ssu.ac.kr/공지사항/?slug=abc&amp;category=학사">
                  <span class="d-inline-blcok m-pt-5"> 2025학년도 장학 안내 </span>
                </a>
              </div>
              <div class="notice_col3">
                <a href="/공지사항/?slug=def"><strong>제목 없음</strong></a>
              </div>
              <div class="notice_col3"><span class="d-inline-blcok m-pt-5">앵커 없음</span></div>
            </div>
        "#;
        let items = ScatchExtractor
            .extract(page, &base("https://scatch.ssu.ac.kr/%ea%b3%b5%ec%a7%80%ec%82%ac%ed%95%ad/"))
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "2025학년도 장학 안내");
        assert_eq!(
            items[0].link,
            "https://scatch.ssu.ac.kr/공지사항/?slug=abc&category=학사"
        );
        assert_eq!(items[1].title, "");
        assert_eq!(items[1].link, "https://scatch.ssu.ac.kr/공지사항/?slug=def");
        assert_eq!(items[2].title, "앵커 없음");
        assert_eq!(items[2].link, "");
    }

    #[test]
    fn test_disu_prefixes_category_and_skips_headerless_rows() {
        let page = r#"
            <div id="zcmsprogram"><div><table>
              <tbody>
                <tr><td class="num">번호</td><td class="subject">제목</td></tr>
                <tr>
                  <td class="title noti-tit">
                    <span class="hidden-md-up">[학부]</span>
                    <a href="/community/notice?cidx=38&amp;idx=77">  연구실 인턴 모집 </a>
                  </td>
                </tr>
                <tr><td class="title noti-tit"><a href="https://www.disu.ac.kr/community/notice?idx=78">세미나</a></td></tr>
                <tr><td class="title noti-tit">삭제된 글</td></tr>
              </tbody>
            </table></div></div>
        "#;
        let items = DisuExtractor
            .extract(page, &base("https://www.disu.ac.kr/community/notice?cidx=38"))
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "[학부] 연구실 인턴 모집");
        assert_eq!(
            items[0].link,
            "https://www.disu.ac.kr/community/notice?cidx=38&idx=77"
        );
        assert_eq!(items[1].title, "세미나");
        assert_eq!(items[2], Item::new("", ""));
    }

    #[test]
    fn test_unrelated_markup_yields_nothing() {
        let base = base("https://example.com/");
        for kind in [
            MarkupKind::InfocomSubject,
            MarkupKind::ScatchNotice,
            MarkupKind::DisuTable,
        ] {
            let items = extractor_for(kind)
                .extract("<html><body><p>점검 중</p></body></html>", &base)
                .unwrap();
            assert!(items.is_empty());
        }
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }
}
