//! The demo election the front end ships with.

use super::Catalog;
use crate::error::CatalogError;
use crate::models::{Aspirant, Candidate, Category, Position, ResultsSection};

pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    let positions = vec![
        Position::new("hod", "HOD", &["Dr. Johnson Smith", "Prof. Sarah Williams", "Dr. Michael Brown"]),
        Position::new("examOfficer", "Exam Officer", &["Dr. Emily Davis", "Prof. Robert Wilson", "Dr. Lisa Anderson"]),
        Position::new("secretary1", "Secretary (Position 1)", &["John Thompson", "Mary Johnson", "David Lee"]),
        Position::new("secretary2", "Secretary (Position 2)", &["Anna Martinez", "James Taylor", "Jennifer White"]),
    ];

    let categories = vec![
        category("hod", "HOD ASPIRANTS", &[
            (1, "Mustapha Aminu", "COEN PARTY", "/images/candidate1.jpeg", "Euqw12jskaOjSdF"),
            (2, "Raji Abdulfatai Ridwan", "CVEN PARTY", "/images/candidate2.jpeg", "Bxqp98mklaPqWer"),
            (3, "Dr. Sarah Johnson", "TECH PARTY", "/images/candidate3.jpeg", "Cytr45nopbRtYui"),
        ]),
        category("examOfficer", "EXAM OFFICER ASPIRANTS", &[
            (4, "Ahmed Bello", "ACADEMIC PARTY", "/images/exam1.jpeg", "Dxyw67qrsaLmNop"),
            (5, "Fatima Hassan", "PROGRESS PARTY", "/images/exam2.jpeg", "Ezab89tuvbQwErt"),
        ]),
        category("secretary", "SECRETARY ASPIRANTS", &[
            (6, "Kemi Adebayo", "UNITY PARTY", "/images/secretary1.jpeg", "Fhgc12defcZxCvb"),
            (7, "Ibrahim Yusuf", "FORWARD PARTY", "/images/secretary2.jpeg", "Gjkl34ghijAsQwe"),
        ]),
    ];

    let results = vec![
        section("hod", "HOD ASPIRANTS", &[
            (1, "Mustapha Abdulazez", "Progressive Party", "/images/candidate1.jpg"),
            (2, "Sarah Johnson", "Unity Alliance", "/images/candidate2.jpg"),
            (3, "Ahmed Ibrahim", "Reform Movement", "/images/candidate3.jpg"),
            (4, "Grace Adebayo", "Independent", "/images/candidate4.jpg"),
        ]),
        section("examOfficer", "EXAM OFFICER", &[
            (5, "Mustapha Abdulazez", "Academic Excellence", "/images/candidate1.jpg"),
            (6, "Dr. Fatima Ali", "Education First", "/images/candidate5.jpg"),
            (7, "Prof. John Smith", "Innovation Party", "/images/candidate6.jpg"),
            (8, "Aisha Mohammed", "Independent", "/images/candidate7.jpg"),
        ]),
        section("secretary1", "SECRETARY (Position 1)", &[
            (9, "Mustapha Abdulazez", "Administrative Excellence", "/images/candidate1.jpg"),
            (10, "Kemi Oluwaseun", "Efficient Governance", "/images/candidate8.jpg"),
            (11, "David Okafor", "Transparency First", "/images/candidate9.jpg"),
            (12, "Blessing Eze", "Independent", "/images/candidate10.jpg"),
        ]),
        section("secretary2", "SECRETARY (Position 2)", &[
            (13, "Mustapha Abdulazez", "Digital Transformation", "/images/candidate1.jpg"),
            (14, "Yusuf Hassan", "Modern Administration", "/images/candidate11.jpg"),
            (15, "Folake Adamu", "Progressive Alliance", "/images/candidate12.jpg"),
            (16, "Chidi Okwu", "Independent", "/images/candidate13.jpg"),
        ]),
    ];

    Catalog::new(positions, categories, results)
}

fn category(id: &str, label: &str, aspirants: &[(u32, &str, &str, &str, &str)]) -> Category {
    Category {
        id: id.to_string(),
        label: label.to_string(),
        aspirants: aspirants
            .iter()
            .map(|(id, name, party, image, public_key)| Aspirant {
                id: *id,
                name: name.to_string(),
                party: party.to_string(),
                image: image.to_string(),
                public_key: public_key.to_string(),
            })
            .collect(),
    }
}

// Every sample section opens with the same 550/300/100/50 split of 1000 votes.
fn section(key: &str, title: &str, candidates: &[(u32, &str, &str, &str); 4]) -> ResultsSection {
    const STARTING_VOTES: [u64; 4] = [550, 300, 100, 50];
    ResultsSection {
        key: key.to_string(),
        title: title.to_string(),
        reported_total: Some(1000),
        candidates: candidates
            .iter()
            .zip(STARTING_VOTES)
            .map(|((id, name, party, image), votes)| Candidate {
                id: *id,
                name: name.to_string(),
                party: party.to_string(),
                image_ref: Some(image.to_string()),
                votes,
            })
            .collect(),
    }
}
