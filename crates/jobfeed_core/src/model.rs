use std::fmt;

/// Server-assigned, stable job identifier.
pub type JobId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmploymentType {
    FullTime,
    Internship,
}

/// Category selector for search. `All` matches every employment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    FullTime,
    Internship,
}

impl Category {
    pub fn matches(self, employment_type: EmploymentType) -> bool {
        match self {
            Category::All => true,
            Category::FullTime => employment_type == EmploymentType::FullTime,
            Category::Internship => employment_type == EmploymentType::Internship,
        }
    }

    /// Wire form sent as the `category` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::FullTime => "full-time",
            Category::Internship => "internship",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// A job posting as displayed by the client. Job content is read-only from
/// the client's perspective; only interaction state (saved/applied) changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: EmploymentType,
    /// External application URL.
    pub apply_url: String,
    /// Markdown summary of the posting.
    pub summary: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub logo_url: Option<String>,
    pub logo_background: Option<String>,
}

/// The last search the user committed: trimmed term plus category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub category: Category,
}
