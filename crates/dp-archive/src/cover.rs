//! Client for the university's cover-generation service.
//!
//! The service takes the cover fields as a multipart form POST and responds
//! with the rendered cover page as a PDF. Field naming follows the service's
//! own form; the bilingual fields are resolved to one language before
//! posting.

use reqwest::multipart::Form;
use tracing::{debug, info};
use url::Url;

use crate::{ArchiveError, ArchiveResult};

/// Language of the generated cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverLanguage {
    English,
    Swedish,
}

/// A field carried in both languages, resolved per cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bilingual {
    pub en: String,
    pub sv: String,
}

impl Bilingual {
    pub fn resolve(&self, language: CoverLanguage) -> &str {
        match language {
            CoverLanguage::English => &self.en,
            CoverLanguage::Swedish => &self.sv,
        }
    }
}

/// Everything the cover service needs for one cover page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverRequest {
    pub language: CoverLanguage,
    /// Degree level code, e.g. `second-level-30`.
    pub degree: String,
    /// Exam class code from the cover form's exam selector.
    pub exam: u8,
    pub area: Bilingual,
    pub school: Bilingual,
    pub year: i32,
    pub title: String,
    pub subtitle: Option<String>,
    pub authors: Vec<String>,
    pub trita: String,
}

/// Map a degree-project course's cycle and credit volume to the cover
/// service's degree level code. Unlisted volumes have no cover variant.
pub fn degree_code(cycle: u32, credits: f64) -> Option<&'static str> {
    match (cycle, credits) {
        (1, c) if c == 7.5 => Some("first-level-7"),
        (1, c) if c == 10.0 => Some("first-level-10"),
        (1, c) if c == 15.0 => Some("first-level-15"),
        (2, c) if c == 15.0 => Some("second-level-15"),
        (2, c) if c == 30.0 => Some("second-level-30"),
        (2, c) if c == 60.0 => Some("second-level-60"),
        _ => None,
    }
}

/// HTTP client for the cover-generation endpoint.
#[derive(Debug, Clone)]
pub struct CoverClient {
    http_client: reqwest::Client,
    endpoint: Url,
}

impl CoverClient {
    pub fn new(endpoint: Url) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("dp-tools/1.0")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http_client,
            endpoint,
        }
    }

    /// POST the cover fields and return the rendered PDF bytes.
    pub async fn generate(&self, request: &CoverRequest) -> ArchiveResult<Vec<u8>> {
        let mut form = Form::new()
            .text("degree", request.degree.clone())
            .text("exam", request.exam.to_string())
            .text("area", request.area.resolve(request.language).to_string())
            .text("school", request.school.resolve(request.language).to_string())
            .text("year", request.year.to_string())
            .text("title", request.title.clone())
            .text("author", request.authors.join(", "))
            .text("trita", request.trita.clone());
        if let Some(subtitle) = &request.subtitle {
            form = form.text("secondaryTitle", subtitle.clone());
        }

        let referer = match request.language {
            CoverLanguage::English => format!("{}?l=en", self.endpoint.origin().ascii_serialization()),
            CoverLanguage::Swedish => self.endpoint.origin().ascii_serialization(),
        };
        debug!(endpoint = %self.endpoint, trita = %request.trita, "requesting cover page");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(reqwest::header::REFERER, referer)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArchiveError::CoverService {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        info!(size = bytes.len(), "cover page generated");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_codes_cover_both_cycles() {
        assert_eq!(degree_code(1, 15.0), Some("first-level-15"));
        assert_eq!(degree_code(2, 30.0), Some("second-level-30"));
        assert_eq!(degree_code(2, 60.0), Some("second-level-60"));
    }

    #[test]
    fn unlisted_credit_volume_has_no_degree_code() {
        assert_eq!(degree_code(1, 30.0), None);
        assert_eq!(degree_code(2, 7.5), None);
    }

    #[test]
    fn bilingual_fields_resolve_per_language() {
        let area = Bilingual {
            en: "Information and Communication Technology".to_string(),
            sv: "Informations- och kommunikationsteknik".to_string(),
        };
        assert_eq!(
            area.resolve(CoverLanguage::Swedish),
            "Informations- och kommunikationsteknik"
        );
    }
}
