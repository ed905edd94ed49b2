//! The fixed sector/sub-category taxonomy.
//!
//! These labels are an external contract: they come from the programme's
//! review framework and are embedded verbatim into the extraction prompt.
//! Spelling quirks are part of the labels and must not be corrected here.
//! Extracted records are never validated against this list; it exists to
//! tell the model what vocabulary to use.

/// One sector with its predefined sub-categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorDef {
    /// Sector label.
    pub name: &'static str,

    /// Sub-category labels under the sector.
    pub sub_categories: &'static [&'static str],
}

/// The predefined sectors and sub-categories, in presentation order.
pub const TAXONOMY: &[SectorDef] = &[
    SectorDef {
        name: "Sashakt Labharthi: Saturation Of Flagship Schemes",
        sub_categories: &[
            "Identification and Saturation of Beneficiaries",
            "Doorstep Delivery of Scheme Benefits",
        ],
    },
    SectorDef {
        name: "Shikshit Arunachal: Education, Entrepreneurship & Employment",
        sub_categories: &[
            "Rationalization of Student Enrolment and Teacher Distribution",
            "Inclusive Education and focus on Improving Learning Outcomes",
            "Improve pass percentage of students",
            "Action Points from Chintan Shivir & Consultative Meetings",
            "Skill Identification and Promotion of Skill Developmet Programs",
            "Monitor and support ITI and polytechnic graduates",
        ],
    },
    SectorDef {
        name: "Swasth Arunachal: Health",
        sub_categories: &[
            "Health Coverage under Ayushman Bharat and CMAAY",
            "Institutional Deliveries, Vaccinations and TB Notifications Rate",
            "One District One Health Theme",
            "Drug-Free Districts by 2029",
        ],
    },
    SectorDef {
        name: "Unnat Krishi: Agriculture",
        sub_categories: &[
            "Key interventions under Unnat Krishi initiative",
            "One District, One Product",
        ],
    },
    SectorDef {
        name: "Sundar Arunachal: Tourism and Heritage",
        sub_categories: &[
            "Tourism Development:One District, One Tourist Spot",
            "One District, One Cuisine Program",
        ],
    },
    SectorDef {
        name: "Samriddh Arunachal: Good Governance",
        sub_categories: &[
            "Bottom-Up Planning and Community Participation",
            "Connectivity of Unconnected Areas",
            "Northeast Region SDG Index",
            "Revenue Augmentation",
            "Inventor of Public Infrastructure and Master Plans for Towns",
            "Enhancing Quality of Life of Citizens and Improved Grievance Redressal",
            "Capacty Building of Government Servants",
            "Review of Suspension Cases and Disciplinary Proceedings",
        ],
    },
    SectorDef {
        name: "Surakshit Arunachal: Security, Law & Order",
        sub_categories: &[
            "Removal and Halt of Land Encroachments and creation of Land Banks",
        ],
    },
    SectorDef {
        name: "Major Infrastructure Projects",
        sub_categories: &["Status of Long Pending Infrastructure Projects"],
    },
];

/// Render the taxonomy as the plain-text block the extraction prompt embeds.
pub fn prompt_block() -> String {
    let mut block = String::new();
    for sector in TAXONOMY {
        block.push_str(sector.name);
        block.push('\n');
        for sub in sector.sub_categories {
            block.push_str("- ");
            block.push_str(sub);
            block.push('\n');
        }
        block.push('\n');
    }
    block.pop();
    block
}
