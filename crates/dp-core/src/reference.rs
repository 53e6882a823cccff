//! Program/course/examiner reference tables and their reloadable snapshot.
//!
//! The tables come from JSON files produced by the school's course-catalog
//! extraction scripts. They are loaded once into an immutable snapshot; the
//! `/Reload` route builds a fresh snapshot from disk and swaps it in behind a
//! single pointer so in-flight requests never observe a torn mix of old and
//! new tables.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::wizard::GradingScale;

/// A degree program: credit volume plus bilingual titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    #[serde(deserialize_with = "lenient_u32")]
    pub credits: u32,
    pub title_en: String,
    pub title_sv: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// A degree-project course as listed in the bilingual catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub title: String,
    pub credits: String,
}

/// Bilingual title of a program specialization track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTitle {
    pub en: String,
    pub sv: String,
}

/// Specialization tracks per program code.
pub type Specializations = HashMap<String, BTreeMap<String, TrackTitle>>;

/// Course codes allowed per program, keyed `cycle<N>` then program code.
pub type CourseCodesByProgram = HashMap<String, HashMap<String, Vec<String>>>;

/// The course-data file as written on disk.
#[derive(Debug, Deserialize)]
struct RawCourseData {
    #[serde(deserialize_with = "lenient_u32")]
    cycle_number: u32,
    school_acronym: String,
    programs_in_the_school_with_titles: BTreeMap<String, ProgramInfo>,
    #[serde(default)]
    dept_codes: HashMap<String, String>,
    #[serde(default)]
    all_course_examiners: HashMap<String, Vec<String>>,
    #[serde(rename = "AF_courses", default)]
    af_courses: Vec<String>,
    #[serde(rename = "PF_courses", default)]
    pf_courses: Vec<String>,
    #[serde(rename = "relevant_courses_English", default)]
    courses_english: HashMap<String, CourseInfo>,
    #[serde(rename = "relevant_courses_Swedish", default)]
    courses_swedish: HashMap<String, CourseInfo>,
    #[serde(rename = "AF_course_codes_by_program", default)]
    af_course_codes_by_program: CourseCodesByProgram,
    #[serde(rename = "PF_course_codes_by_program", default)]
    pf_course_codes_by_program: CourseCodesByProgram,
}

/// Immutable snapshot of the reference tables. The program table is already
/// restricted to the file's cycle when the snapshot is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceData {
    pub cycle_number: u32,
    pub school_acronym: String,
    pub programs: BTreeMap<String, ProgramInfo>,
    pub dept_codes: HashMap<String, String>,
    pub course_examiners: HashMap<String, Vec<String>>,
    pub af_courses: Vec<String>,
    pub pf_courses: Vec<String>,
    pub courses_english: HashMap<String, CourseInfo>,
    pub courses_swedish: HashMap<String, CourseInfo>,
    pub af_course_codes_by_program: CourseCodesByProgram,
    pub pf_course_codes_by_program: CourseCodesByProgram,
    pub specializations: Specializations,
}

impl ReferenceData {
    /// Load a snapshot from the course-data file, with an optional
    /// specializations file.
    pub fn load(
        course_data: &Path,
        specializations: Option<&Path>,
    ) -> crate::Result<Self> {
        let raw: RawCourseData = serde_json::from_str(&std::fs::read_to_string(course_data)?)?;
        let specializations = match specializations {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => Specializations::default(),
        };
        info!(
            school = %raw.school_acronym,
            cycle = raw.cycle_number,
            programs = raw.programs_in_the_school_with_titles.len(),
            "loaded reference data"
        );
        Ok(Self::from_raw(raw, specializations))
    }

    fn from_raw(raw: RawCourseData, specializations: Specializations) -> Self {
        let programs =
            programs_in_cycle(raw.cycle_number, &raw.programs_in_the_school_with_titles);
        Self {
            cycle_number: raw.cycle_number,
            school_acronym: raw.school_acronym,
            programs,
            dept_codes: raw.dept_codes,
            course_examiners: raw.all_course_examiners,
            af_courses: raw.af_courses,
            pf_courses: raw.pf_courses,
            courses_english: raw.courses_english,
            courses_swedish: raw.courses_swedish,
            af_course_codes_by_program: raw.af_course_codes_by_program,
            pf_course_codes_by_program: raw.pf_course_codes_by_program,
            specializations,
        }
    }

    /// Examiners configured for a course, sorted. Empty when the course has
    /// none.
    pub fn examiners_for_course(&self, course_code: &str) -> Vec<String> {
        let mut examiners =
            self.course_examiners.get(course_code).cloned().unwrap_or_default();
        examiners.sort();
        examiners
    }

    /// The course list offered for a program at the given grading scale,
    /// sorted. The per-program constraint map restricts the scale's full
    /// list; a program with no constraint entry, or whose constraints leave
    /// nothing, falls back to the unfiltered list.
    pub fn courses_for_program(&self, program_code: &str, scale: GradingScale) -> Vec<String> {
        let (base, by_program) = match scale {
            GradingScale::AF => (&self.af_courses, &self.af_course_codes_by_program),
            GradingScale::PF => (&self.pf_courses, &self.pf_course_codes_by_program),
        };

        let cycle_code = format!("cycle{}", self.cycle_number);
        let allowed = by_program.get(&cycle_code).and_then(|c| c.get(program_code));

        let mut courses = match allowed {
            Some(allowed) if !allowed.is_empty() => {
                let filtered: Vec<String> =
                    base.iter().filter(|c| allowed.contains(c)).cloned().collect();
                if filtered.is_empty() {
                    base.clone()
                } else {
                    filtered
                }
            }
            _ => base.clone(),
        };
        courses.sort();
        courses
    }

    /// Restrict a course list to an administrator-imposed choice set
    /// (a `⚄⚄|`-marked column entry). An empty intersection yields an empty
    /// list: the student was constrained to courses that are not offered.
    pub fn restrict_to_choices(courses: &[String], choices: &[String]) -> Vec<String> {
        courses.iter().filter(|c| choices.contains(c)).cloned().collect()
    }
}

/// Restrict a program table to the programs relevant for a cycle:
/// 270+ credit engineering programs belong to cycles 1 and 2, 180-credit
/// programs to cycle 1, 120-credit masters to cycle 2, 30-credit intakes to
/// cycle 0, and 60-credit programs to cycle 0 or 2 depending on their Swedish
/// title ("Tekniskt basår" vs "Magisterprogram").
pub fn programs_in_cycle(
    cycle: u32,
    programs: &BTreeMap<String, ProgramInfo>,
) -> BTreeMap<String, ProgramInfo> {
    programs
        .iter()
        .filter(|(_, info)| {
            let credits = info.credits;
            (credits >= 270 && (cycle == 1 || cycle == 2))
                || (credits == 180 && cycle == 1)
                || (credits == 120 && cycle == 2)
                || (credits == 30 && cycle == 0)
                || (credits == 60 && cycle == 0 && info.title_sv.contains("Tekniskt basår"))
                || (credits == 60 && cycle == 2 && info.title_sv.contains("Magisterprogram"))
        })
        .map(|(code, info)| (code.clone(), info.clone()))
        .collect()
}

/// Accepts credits and cycle numbers written either as JSON numbers or as
/// numeric strings, as the extraction scripts emit both.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n as u32),
        NumberOrString::String(s) => Ok(s.trim().parse::<f64>().unwrap_or(0.0) as u32),
    }
}

/// Holds the current reference snapshot and rebuilds it on demand.
///
/// Readers clone the `Arc` and keep using the snapshot they got even if a
/// reload lands mid-request; the swap itself is a single pointer assignment
/// under a short-lived write lock.
#[derive(Debug)]
pub struct SnapshotStore {
    course_data_path: PathBuf,
    specializations_path: Option<PathBuf>,
    current: RwLock<Arc<ReferenceData>>,
}

impl SnapshotStore {
    /// Load the initial snapshot from disk.
    pub fn open(
        course_data_path: impl Into<PathBuf>,
        specializations_path: Option<PathBuf>,
    ) -> crate::Result<Self> {
        let course_data_path = course_data_path.into();
        let data =
            ReferenceData::load(&course_data_path, specializations_path.as_deref())?;
        Ok(Self {
            course_data_path,
            specializations_path,
            current: RwLock::new(Arc::new(data)),
        })
    }

    /// The current snapshot.
    pub fn current(&self) -> Arc<ReferenceData> {
        self.current.read().expect("snapshot lock poisoned").clone()
    }

    /// Re-read the files and swap in the fresh snapshot. On a parse or I/O
    /// failure the previous snapshot stays in place.
    pub fn reload(&self) -> crate::Result<Arc<ReferenceData>> {
        match ReferenceData::load(&self.course_data_path, self.specializations_path.as_deref()) {
            Ok(data) => {
                let fresh = Arc::new(data);
                *self.current.write().expect("snapshot lock poisoned") = fresh.clone();
                Ok(fresh)
            }
            Err(e) => {
                warn!(error = %e, "reference data reload failed; keeping previous snapshot");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn program(credits: u32, title_sv: &str) -> ProgramInfo {
        ProgramInfo {
            credits,
            title_en: "Programme".to_string(),
            title_sv: title_sv.to_string(),
            owner: Some("EECS".to_string()),
        }
    }

    #[test]
    fn cycle_two_keeps_civing_masters_and_magister_programs() {
        let mut programs = BTreeMap::new();
        programs.insert("CDATE".to_string(), program(270, "Civilingenjörsutbildning"));
        programs.insert("TIDAB".to_string(), program(180, "Högskoleingenjörsutbildning"));
        programs.insert("TCOMM".to_string(), program(120, "Masterprogram"));
        programs.insert("TMAGI".to_string(), program(60, "Magisterprogram, nätverkstjänster"));
        programs.insert("TBASA".to_string(), program(60, "Tekniskt basår"));
        programs.insert("KORTA".to_string(), program(30, "Kompletterande utbildning"));

        let relevant = programs_in_cycle(2, &programs);
        let codes: Vec<&str> = relevant.keys().map(String::as_str).collect();
        assert_eq!(codes, ["CDATE", "TCOMM", "TMAGI"]);
    }

    #[test]
    fn sixty_credit_program_without_magister_title_is_excluded() {
        let mut programs = BTreeMap::new();
        programs.insert("TOTHR".to_string(), program(60, "Påbyggnadsutbildning"));
        assert!(programs_in_cycle(2, &programs).is_empty());
    }

    #[test]
    fn cycle_one_keeps_both_engineering_volumes() {
        let mut programs = BTreeMap::new();
        programs.insert("CDATE".to_string(), program(300, "Civilingenjörsutbildning"));
        programs.insert("TIDAB".to_string(), program(180, "Högskoleingenjörsutbildning"));
        programs.insert("TCOMM".to_string(), program(120, "Masterprogram"));
        let relevant = programs_in_cycle(1, &programs);
        let codes: Vec<&str> = relevant.keys().map(String::as_str).collect();
        assert_eq!(codes, ["CDATE", "TIDAB"]);
    }

    fn fixture_json() -> &'static str {
        r#"{
            "cycle_number": "2",
            "school_acronym": "EECS",
            "programs_in_the_school_with_titles": {
                "CINTE": {"owner": "EECS", "title_en": "Information and Communication Technology", "title_sv": "Civilingenjörsutbildning i informationsteknik", "credits": "300.0"},
                "TBASA": {"owner": "EECS", "title_en": "Technical Preparatory Year", "title_sv": "Tekniskt basår", "credits": 60}
            },
            "dept_codes": {"CS": "Computer Science"},
            "all_course_examiners": {"II225X": ["Gerald Q. Maguire Jr", "Anne Håkansson"]},
            "AF_courses": ["II225X", "II245X"],
            "PF_courses": ["II143X"],
            "relevant_courses_English": {"II225X": {"title": "Degree Project in ICT", "credits": "30.0"}},
            "relevant_courses_Swedish": {"II225X": {"title": "Examensarbete inom IKT", "credits": "30.0"}},
            "AF_course_codes_by_program": {"cycle2": {"CINTE": ["II225X"]}},
            "PF_course_codes_by_program": {}
        }"#
    }

    fn write_fixture(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("course-data.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(fixture_json().as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_filters_programs_by_cycle() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_fixture(&dir);
        let data = ReferenceData::load(&path, None).unwrap();
        assert_eq!(data.cycle_number, 2);
        // TBASA (60 credits, basår) is cycle-0 only.
        assert!(data.programs.contains_key("CINTE"));
        assert!(!data.programs.contains_key("TBASA"));
    }

    #[test]
    fn constrained_program_gets_only_its_courses() {
        let dir = tempfile::TempDir::new().unwrap();
        let data = ReferenceData::load(&write_fixture(&dir), None).unwrap();
        assert_eq!(
            data.courses_for_program("CINTE", GradingScale::AF),
            vec!["II225X".to_string()]
        );
        // No PF constraints configured: the full PF list comes back.
        assert_eq!(
            data.courses_for_program("CINTE", GradingScale::PF),
            vec!["II143X".to_string()]
        );
        // Unknown program: unfiltered AF list.
        assert_eq!(
            data.courses_for_program("CDEPR", GradingScale::AF),
            vec!["II225X".to_string(), "II245X".to_string()]
        );
    }

    #[test]
    fn reload_is_idempotent_over_identical_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_fixture(&dir);
        let store = SnapshotStore::open(&path, None).unwrap();
        let first = store.current();
        store.reload().unwrap();
        store.reload().unwrap();
        assert_eq!(*store.current(), *first);
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_fixture(&dir);
        let store = SnapshotStore::open(&path, None).unwrap();
        let before = store.current();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(*store.current(), *before);
    }
}
