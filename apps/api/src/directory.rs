//! Approved-ecosystem directory: ACT member companies, Franklin Cummings Tech
//! programs and MassCEC internships.
//!
//! This is the complete universe the pipeline may talk about. Every company
//! lookup and every recommendation resolves against these tables; nothing is
//! fetched from outside them.

/// An ACT member company profile.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryEntry {
    pub name: &'static str,
    pub overview: &'static str,
    pub website: &'static str,
    pub careers_url: &'static str,
    pub linkedin: &'static str,
    pub industry: &'static str,
    pub subsector: &'static str,
}

/// A Franklin Cummings Tech training program.
#[derive(Debug, Clone, Copy)]
pub struct TrainingProgram {
    pub name: &'static str,
    pub url: &'static str,
    pub duration: &'static str,
    pub skills_covered: &'static [&'static str],
}

/// A MassCEC internship offering.
#[derive(Debug, Clone, Copy)]
pub struct InternshipProgram {
    pub name: &'static str,
    pub url: &'static str,
    pub duration: &'static str,
    pub focus_areas: &'static [&'static str],
}

/// Immutable store of the approved directory. Built once at startup and
/// shared behind an `Arc`; request handling never mutates it.
#[derive(Debug)]
pub struct DirectoryStore {
    members: Vec<DirectoryEntry>,
    programs: Vec<TrainingProgram>,
    internships: Vec<InternshipProgram>,
}

impl DirectoryStore {
    pub fn new(
        members: Vec<DirectoryEntry>,
        programs: Vec<TrainingProgram>,
        internships: Vec<InternshipProgram>,
    ) -> Self {
        Self {
            members,
            programs,
            internships,
        }
    }

    /// The full approved dataset.
    pub fn approved() -> Self {
        Self::new(act_members(), franklin_cummings_programs(), masscec_internships())
    }

    pub fn members(&self) -> &[DirectoryEntry] {
        &self.members
    }

    pub fn programs(&self) -> &[TrainingProgram] {
        &self.programs
    }

    pub fn internships(&self) -> &[InternshipProgram] {
        &self.internships
    }

    /// Exact-name member lookup. Company names are the identity keys used by
    /// tool calls, so matching is deliberately strict.
    pub fn member(&self, name: &str) -> Option<&DirectoryEntry> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn is_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// One document per directory record, for the semantic knowledge index.
    pub fn knowledge_corpus(&self) -> Vec<String> {
        let mut corpus = Vec::with_capacity(
            self.members.len() + self.programs.len() + self.internships.len(),
        );
        for member in &self.members {
            corpus.push(format!(
                "{}: {} Industry: {}. Subsector: {}.",
                member.name, member.overview, member.industry, member.subsector
            ));
        }
        for program in &self.programs {
            corpus.push(format!(
                "{} ({}, {}): covers {}.",
                program.name,
                program.url,
                program.duration,
                program.skills_covered.join(", ")
            ));
        }
        for internship in &self.internships {
            corpus.push(format!(
                "{} ({}, {}): focus areas {}.",
                internship.name,
                internship.url,
                internship.duration,
                internship.focus_areas.join(", ")
            ));
        }
        corpus
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Approved datasets
// ────────────────────────────────────────────────────────────────────────────

fn act_members() -> Vec<DirectoryEntry> {
    vec![
        DirectoryEntry {
            name: "Abode Energy Management",
            overview: "Energy efficiency and carbon reduction consulting, energy management services for utilities, contractors, and homeowners, including in-person and remote business models.",
            website: "https://www.abodeem.com",
            careers_url: "https://www.linkedin.com/jobs/view/decarbonization-specialist-at-abode-energy-management-3895632336",
            linkedin: "https://www.linkedin.com/company/abode-energy-management/",
            industry: "Environmental Services; Energy Management",
            subsector: "Energy efficiency; Decarbonization",
        },
        DirectoryEntry {
            name: "Action for Boston Community Development, Inc. (ABCD)",
            overview: "Low-income assistance programs including energy assistance (LIHEAP), weatherization program, food voucher programs, ESOL classes, and job opportunities for the community.",
            website: "http://www.bostonabcd.org",
            careers_url: "https://careers.bostonabcd.org/#js-careers-jobs-block",
            linkedin: "https://www.linkedin.com/company/action-for-boston-community-development/",
            industry: "Nonprofit Organization Management; Human Services",
            subsector: "Community Development; Social Services",
        },
        DirectoryEntry {
            name: "Agilitas Energy, Inc.",
            overview: "Development, building, ownership, and operation of distributed energy storage and solar PV systems",
            website: "https://www.agilitasenergy.com",
            careers_url: "https://agilitasenergy.com/contact/",
            linkedin: "https://www.linkedin.com/company/agilitas-energy-inc/",
            industry: "Renewable Energy; Energy Storage",
            subsector: "Solar PV Systems; Battery Energy Storage Systems",
        },
        DirectoryEntry {
            name: "Analog Devices",
            overview: "Analog, mixed-signal, and digital signal processing (DSP) integrated circuits (IC) development and manufacturing.",
            website: "https://www.analog.com",
            careers_url: "https://analogdevices.wd1.myworkdayjobs.com/External",
            linkedin: "https://www.linkedin.com/company/analog-devices/",
            industry: "Semiconductor Manufacturing",
            subsector: "Analog, Mixed-Signal, and Digital Signal Processing Integrated Circuits",
        },
        DirectoryEntry {
            name: "Franklin Cummings Tech",
            overview: "Technical and trade education, including programs in HVAC & Refrigeration, Engineering, and Cybersecurity.",
            website: "https://www.franklincummings.edu",
            careers_url: "https://recruiting.paylocity.com/recruiting/jobs/All/7566732a-4240-4a20-a614-53c85b140700/Benjamin-Franklin-Cummings-Institute-of-Technology",
            linkedin: "https://www.linkedin.com/school/franklincummingstech/",
            industry: "Education; Technology",
            subsector: "Technical College; STEM Education",
        },
        DirectoryEntry {
            name: "BerryDunn",
            overview: "BerryDunn is a full-service accounting, assurance, and consulting firm headquartered in Portland, Maine, serving clients across the United States and internationally.",
            website: "https://www.berrydunn.com",
            careers_url: "https://careers-berrydunn.icims.com/jobs/search?hashed=-626005938&mobile=false&width=1240&height=500&bga=true&needsRedirect=false&jan1offset=-300&jun1offset=-240",
            linkedin: "https://www.linkedin.com/company/berrydunn/",
            industry: "Accounting; Consulting",
            subsector: "Tax; Advisory; Assurance",
        },
        DirectoryEntry {
            name: "BioMed Realty",
            overview: "BioMed Realty, a Blackstone Real Estate portfolio company, is a leading provider of real estate solutions for the life science and technology industries.",
            website: "http://www.biomedrealty.com",
            careers_url: "https://www.biomedrealty.com/careers#current-openings",
            linkedin: "https://www.linkedin.com/company/biomed-realty/",
            industry: "Real Estate",
            subsector: "Life Science Real Estate; Technology Industries Real Estate",
        },
        DirectoryEntry {
            name: "Clean Energy Ventures",
            overview: "Clean Energy Ventures (CEV) is a venture capital firm that invests in early-stage companies commercializing disruptive advanced energy technologies and business model innovations.",
            website: "https://www.cleanenergyventures.com",
            careers_url: "https://cleanenergyventures.com/careers/",
            linkedin: "https://www.linkedin.com/company/clean-energy-ventures/",
            industry: "Venture Capital; Private Equity",
            subsector: "Clean Energy; Climate Technology",
        },
        DirectoryEntry {
            name: "CleanCapital",
            overview: "CleanCapital is a financial technology company that accelerates investment in clean energy projects. It focuses on identifying, screening, and managing clean energy projects, enabling project owners an opportunity to exit their portfolios while providing accredited investors, including institutional investors, access to these opportunities.",
            website: "https://cleancapital.com/",
            careers_url: "https://cleancapital.com/careers/",
            linkedin: "https://www.linkedin.com/company/cleancapital/",
            industry: "Renewable Energy; Financial Services",
            subsector: "Solar Energy; Energy Storage",
        },
        DirectoryEntry {
            name: "Commonwealth Fusion Systems",
            overview: "Development and commercialization of fusion energy technology.",
            website: "https://www.cfs.energy/",
            careers_url: "https://jobs.lever.co/cfsenergy",
            linkedin: "https://www.linkedin.com/company/commonwealth-fusion-systems/",
            industry: "Energy; Renewable Energy Power Generation",
            subsector: "Nuclear Fusion Energy",
        },
    ]
}

fn franklin_cummings_programs() -> Vec<TrainingProgram> {
    vec![
        TrainingProgram {
            name: "HVAC & Refrigeration Technology",
            url: "https://franklincummings.edu/academics/academic-programs/hvacr/",
            duration: "2 years",
            skills_covered: &["HVAC systems", "refrigeration", "energy efficiency", "system maintenance"],
        },
        TrainingProgram {
            name: "Renewable Energy Technology",
            url: "https://franklincummings.edu/academics/academic-programs/renewable-energy-technology/",
            duration: "2 years",
            skills_covered: &["solar PV", "wind energy", "energy storage", "system design"],
        },
        TrainingProgram {
            name: "Practical Electricity",
            url: "https://franklincummings.edu/academics/academic-programs/practical-electricity/",
            duration: "2 years",
            skills_covered: &["electrical systems", "wiring", "electrical code", "circuit design"],
        },
        TrainingProgram {
            name: "Construction Management",
            url: "https://franklincummings.edu/academics/academic-programs/construction-management/",
            duration: "2 years",
            skills_covered: &["green building", "project management", "sustainable construction", "building codes"],
        },
    ]
}

fn masscec_internships() -> Vec<InternshipProgram> {
    vec![
        InternshipProgram {
            name: "Clean Energy Internship Program",
            url: "https://www.masscec.com/clean-energy-internships-students",
            duration: "Fall, Spring, Summer sessions",
            focus_areas: &["solar energy", "wind energy", "energy efficiency", "clean transportation"],
        },
        InternshipProgram {
            name: "Advancing Climate Justice Internship",
            url: "https://www.masscec.com/advancing-climate-justice-internship",
            duration: "Summer session",
            focus_areas: &["environmental justice", "community outreach", "policy research"],
        },
    ]
}
