//! Inline HTML forms for the wizard pages.
//!
//! The pages are deliberately plain: a heading, a form, a submit button,
//! with English and Swedish side by side the way the paper form had them.
//! They are assembled by string building; there is no template engine.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use dp_core::reference::{CourseInfo, ProgramInfo, ReferenceData};
use dp_core::wizard::GradingScale;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<html>\n<head><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        title, body
    )
}

pub fn not_assignment_launch_page() -> String {
    layout(
        "Launch problem",
        "<p>It looks like this LTI tool wasn't launched as an assignment, or you are \
         trying to take it as a teacher rather than as a student. Make sure to set up \
         an external tool assignment for this tool.</p>",
    )
}

pub fn no_sis_id_page() -> String {
    layout(
        "Launch problem",
        "<p>It looks like there is no user SIS id for this user.</p>",
    )
}

/// Program selection, offered when the student has no (or more than one)
/// stored program of study.
pub fn program_form(programs: &BTreeMap<String, ProgramInfo>) -> String {
    let mut options = String::new();
    for (code, info) in programs {
        options.push_str(&format!(
            "<option value=\"{code}\">{code}: {} | {}</option>\n",
            escape(&info.title_en),
            escape(&info.title_sv)
        ));
    }

    layout(
        "Which program of study are you in? | Vilket studieprogram är du i?",
        &format!(
            "<form action=\"/gotUsersProgram\" method=\"post\">\n\
             <h2><span lang=\"en\">Which program of study are you in?</span> | \
             <span lang=\"sv\">Vilket studieprogram är du i?</span></h2>\n\
             <select name=\"program_code\">\n{options}</select>\n\
             <br><input type=\"submit\" value=\"Submit\" />\n\
             </form>"
        ),
    )
}

/// The general-information page: DiVA permission, title, description,
/// location, contact, planned start, and the grading-scale choice.
pub fn general_form(
    program_code: &str,
    program: &ProgramInfo,
    cycle_number: u32,
    start_today: NaiveDate,
    start_max: NaiveDate,
) -> String {
    let cycle_ordinal = if cycle_number == 1 {
        "1<sup>st</sup>"
    } else {
        "2<sup>nd</sup>"
    };

    // Students in TIVNM can only take the A-F graded course.
    let grading_question = if program_code == "TIVNM" {
        format!(
            "<p><span lang=\"en\">All students in {program_code} must have A-F grading.</span> | \
             <span lang=\"sv\">Alla elever i {program_code} måste ha A-F-gradering.</span></p>"
        )
    } else {
        "<h2><span lang=\"en\">Grading scale</span> | <span lang=\"sv\">Betygsskala</span></h2>\n\
         <p><span lang=\"en\">Do you wish an A-F grade, rather than the default P/F grade for \
         your degree project?</span> | <span lang=\"sv\">Vill du ha ett betygsatt exjobb (A-F), \
         i stället för ett vanligt med bara P/F?</span></p>\n\
         <input type=\"radio\" name=\"grading_scale\" value=\"grading_scale_AF\"/>\
         &nbsp;<span lang=\"en\">Grade A-F</span> | <span lang=\"sv\">Betygsatt exjobb (A-F)</span><br>\n\
         <input type=\"radio\" name=\"grading_scale\" value=\"grading_scale_PF\" \
         checked=\"checked\" required=\"required\"/>\
         &nbsp;<span lang=\"en\">Pass/Fail (standard)</span> | \
         <span lang=\"sv\">Godkänd eller underkänd (standard)</span>"
            .to_string()
    };

    layout(
        "Application for a degree project",
        &format!(
            "<h1>Application for a {cycle_ordinal} cycle degree project</h1>\n\
             <form action=\"/assessment\" method=\"post\">\n\
             <p><span lang=\"en\">As a student in the {title_en} ({program_code}) you need to \
             complete a degree project. This survey collects some data to help administer your \
             project, register you for the correct course, and assign an appropriate \
             examiner.</span> | <span lang=\"sv\">Som student i {title_sv} ({program_code}) måste \
             du slutföra ett examensarbete.</span></p>\n\
             <h2><span lang=\"en\">Full text in DiVA</span> | <span lang=\"sv\">Fulltext i DiVA</span></h2>\n\
             <p><span lang=\"en\">Do you give the university permission to make the full text of \
             your final report available via DiVA?</span> | <span lang=\"sv\">Ger du tillstånd \
             att publicera hela din slutliga exjobbsrapport elektroniskt i databasen DiVA?</span></p>\n\
             <p><strong><span lang=\"en\">Note that in all cases the report is public and a copy \
             must be provided to anyone on request.</span></strong></p>\n\
             <input type=\"radio\" name=\"diva_permission\" value=\"yes_to_diva\" \
             checked=\"checked\" required=\"required\"/>&nbsp;<span lang=\"en\">I accept \
             publication via DiVA</span> | <span lang=\"sv\">Jag godkänner publicering via DiVA</span><br>\n\
             <input type=\"radio\" name=\"diva_permission\" value=\"no_to_diva\"/>&nbsp;\
             <span lang=\"en\">I do not accept publication via DiVA</span> | \
             <span lang=\"sv\">Jag godkänner inte publicering via DiVA</span>\n\
             <h2><span lang=\"en\">Tentative title</span> | <span lang=\"sv\">Preliminär titel</span></h2>\n\
             <input name=\"tentative_title\" type=\"text\" width=\"1000\" id=\"tentative_title\" />\n\
             <h2><span lang=\"en\">Project description</span> | <span lang=\"sv\">Projektbeskrivning</span></h2>\n\
             <input name=\"prelim_description\" type=\"text\" width=\"1000\" id=\"prelim_description\" />\n\
             <h2><span lang=\"en\">At a company, indicate name</span> | <span lang=\"sv\">På företag, ange vilket</span></h2>\n\
             <input name=\"company\" type=\"text\" width=\"1000\" id=\"company\" />\n\
             <h2><span lang=\"en\">Outside Sweden, indicate country code</span> | \
             <span lang=\"sv\">Utomlands, ange landskod</span></h2>\n\
             <input name=\"country_code\" type=\"text\" pattern=\"[A-Za-z]{{2}}\" width=\"20\" id=\"country_code\" />\n\
             <h2><span lang=\"en\">At another university</span> | <span lang=\"sv\">På annan högskola</span></h2>\n\
             <input name=\"university\" type=\"text\" width=\"1000\" id=\"university\" />\n\
             <h2><span lang=\"en\">Contact</span> | <span lang=\"sv\">Kontaktinformation</span></h2>\n\
             <p><span lang=\"en\">Enter the name and contact details of your contact at a company, \
             other university, etc.</span> | <span lang=\"sv\">Ange namn, e-postadress och annan \
             kontaktinformation för din kontaktperson.</span></p>\n\
             <input name=\"contact\" type=\"text\" width=\"1000\" id=\"contact\" />\n\
             <h2><span lang=\"en\">Planned start</span> | <span lang=\"sv\">Startdatum</span></h2>\n\
             <label for=\"start\">Date/Datum:</label>\n\
             <input type=\"date\" id=\"start\" name=\"planned_start\" value=\"{start_today}\" \
             min=\"{start_today}\" max=\"{start_max}\">\n\
             {grading_question}\n\
             <br><input type=\"submit\" value=\"Submit\" />\n\
             </form>",
            title_en = escape(&program.title_en),
            title_sv = escape(&program.title_sv),
        ),
    )
}

/// Course selection for the chosen grading scale.
pub fn course_form(scale: GradingScale, courses: &[String], reference: &ReferenceData) -> String {
    let heading = match scale {
        GradingScale::AF => {
            "<span lang=\"en\">Course code graded A-F</span> | \
             <span lang=\"sv\">Kurskod - Betygsatt exjobb (A-F)</span>"
        }
        GradingScale::PF => {
            "<span lang=\"en\">Course code with Pass/Fail grading</span> | \
             <span lang=\"sv\">Kurskod med Godkänd eller underkänd</span>"
        }
    };

    let empty = CourseInfo {
        title: String::new(),
        credits: String::new(),
    };
    let mut options = String::new();
    for course in courses {
        let en = reference.courses_english.get(course).unwrap_or(&empty);
        let sv = reference.courses_swedish.get(course).unwrap_or(&empty);
        options.push_str(&format!(
            "<option value=\"{course}\">{course}: {} {} | {}</option>\n",
            escape(&en.credits),
            escape(&en.title),
            escape(&sv.title)
        ));
    }

    layout(
        "Degree project course",
        &format!(
            "<form action=\"/Examiner\" method=\"post\">\n\
             <h2>{heading}</h2>\n\
             <select name=\"selected_course\">\n{options}</select>\n\
             <br><input type=\"submit\" value=\"Submit\" />\n\
             </form>"
        ),
    )
}

/// Examiner selection for the chosen course.
pub fn examiner_form(examiners: &[String]) -> String {
    let mut options = String::new();
    for examiner in examiners {
        options.push_str(&format!(
            "<option value=\"{0}\">{0}</option>\n",
            escape(examiner)
        ));
    }

    layout(
        "Potential Examiner | Potentiell Examinator",
        &format!(
            "<form action=\"/Outcome\" method=\"post\">\n\
             <h2><span lang=\"en\">Potential Examiner</span> | \
             <span lang=\"sv\">Potentiell Examinator</span></h2>\n\
             <select name=\"selected_examiner\">\n{options}</select>\n\
             <br><input type=\"submit\" value=\"Submit\" />\n\
             </form>"
        ),
    )
}

/// Final page after a successful write-back with an examiner.
pub fn outcome_page(course: &str, examiner: &str) -> String {
    layout(
        "Outcome | Utfall",
        &format!(
            "<p><span lang=\"en\">Thank you for selecting course code {course} and potential \
             examiner {examiner}.</span> | <span lang=\"sv\">Tack för att du valt kurskod \
             {course} och potentiell examinator {examiner}.</span></p>\n\
             <p><span lang=\"en\">You have finished the replacement for the paper form. Best of \
             success in your degree project.</span> | <span lang=\"sv\">Du har slutfört \
             ersättningen för pappersblanketten. Lycka till med ditt examensarbete.</span></p>",
            course = escape(course),
            examiner = escape(examiner),
        ),
    )
}

/// Final page when the course has no configured examiner.
pub fn outcome_no_examiner_page(course: &str) -> String {
    layout(
        "Outcome without examiner | Utfall utan examinator",
        &format!(
            "<p><span lang=\"en\">Thank you for selecting course code {course}. Please speak \
             with the education office to find an examiner.</span> | <span lang=\"sv\">Tack för \
             att du valt kurskod {course}. Tala med utbildningskontoret för att hitta en \
             examinator.</span></p>\n\
             <p><span lang=\"en\">You have finished the replacement for the paper form. Best of \
             success in your degree project.</span></p>",
            course = escape(course),
        ),
    )
}

pub fn reload_page(school: &str, cycle: u32) -> String {
    layout(
        "Reload configuration file",
        &format!(
            "<p>Successfully reloaded program and examiner data for {} cycle {}</p>",
            escape(school),
            cycle
        ),
    )
}

/// Presentation-announcement form for instructors. The course roster feeds
/// the student suggestions.
pub fn announce_form(students: &[(u64, String)]) -> String {
    let mut suggestions = String::new();
    for (id, name) in students {
        suggestions.push_str(&format!("<option value=\"{id}\">{}</option>\n", escape(name)));
    }

    layout(
        "Announce a presentation",
        &format!(
            "<form action=\"/announce\" method=\"post\">\n\
             <h2><span lang=\"en\">Announce a degree project presentation</span> | \
             <span lang=\"sv\">Annonsera en exjobbspresentation</span></h2>\n\
             <label for=\"student_id\">Student (Canvas user id or SIS id):</label>\n\
             <input name=\"student_id\" list=\"students\" type=\"text\" id=\"student_id\" /><br>\n\
             <datalist id=\"students\">\n{suggestions}</datalist>\n\
             <label for=\"date\">Date/Datum:</label>\n\
             <input type=\"date\" id=\"date\" name=\"date\" /><br>\n\
             <label for=\"time\">Time/Tid:</label>\n\
             <input type=\"time\" id=\"time\" name=\"time\" value=\"13:00\" /><br>\n\
             <label for=\"location\">Location/Plats:</label>\n\
             <input name=\"location\" type=\"text\" id=\"location\" /><br>\n\
             <label for=\"title\">Title/Titel:</label>\n\
             <input name=\"title\" type=\"text\" width=\"1000\" id=\"title\" /><br>\n\
             <br><input type=\"submit\" value=\"Submit\" />\n\
             </form>"
        ),
    )
}

pub fn announce_confirmation(student_name: &str, date: NaiveDate) -> String {
    layout(
        "Announcement created",
        &format!(
            "<p><span lang=\"en\">The presentation by {student} on {date} has been announced \
             and added to the student's calendar.</span> | <span lang=\"sv\">Presentationen av \
             {student} den {date} har annonserats och lagts till i studentens kalender.</span></p>",
            student = escape(student_name),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_form_lists_each_program_once() {
        let mut programs = BTreeMap::new();
        programs.insert(
            "CINTE".to_string(),
            ProgramInfo {
                credits: 300,
                title_en: "Information and Communication Technology".to_string(),
                title_sv: "Civilingenjörsutbildning i informationsteknik".to_string(),
                owner: None,
            },
        );
        let html = program_form(&programs);
        assert_eq!(html.matches("value=\"CINTE\"").count(), 1);
        assert!(html.contains("action=\"/gotUsersProgram\""));
    }

    #[test]
    fn html_in_titles_is_escaped() {
        let mut programs = BTreeMap::new();
        programs.insert(
            "XPROG".to_string(),
            ProgramInfo {
                credits: 120,
                title_en: "A <b>bold</b> & risky title".to_string(),
                title_sv: "Titel".to_string(),
                owner: None,
            },
        );
        let html = program_form(&programs);
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; risky"));
    }

    #[test]
    fn tivnm_form_fixes_the_grading_scale() {
        let program = ProgramInfo {
            credits: 120,
            title_en: "Programme".to_string(),
            title_sv: "Program".to_string(),
            owner: None,
        };
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let max = NaiveDate::from_ymd_opt(2027, 7, 7).unwrap();
        let html = general_form("TIVNM", &program, 2, today, max);
        assert!(html.contains("must have A-F grading"));
        assert!(!html.contains("name=\"grading_scale\""));
    }
}
