use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a curriculum goal. Unknown kinds coming from the document store
/// deserialize to [`GoalKind::Other`] and are estimated with the default duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalKind {
    Lesson,
    QuestionSet,
    StatuteReading,
    Summary,
    Review,
    Material,
    #[serde(other)]
    Other,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Lesson => "LESSON",
            GoalKind::QuestionSet => "QUESTION_SET",
            GoalKind::StatuteReading => "STATUTE_READING",
            GoalKind::Summary => "SUMMARY",
            GoalKind::Review => "REVIEW",
            GoalKind::Material => "MATERIAL",
            GoalKind::Other => "OTHER",
        }
    }

    /// Human readable label used in calendar summaries.
    pub fn label(&self) -> &'static str {
        match self {
            GoalKind::Lesson => "Lesson",
            GoalKind::QuestionSet => "Questions",
            GoalKind::StatuteReading => "Statute reading",
            GoalKind::Summary => "Summary",
            GoalKind::Review => "Review",
            GoalKind::Material => "Material",
            GoalKind::Other => "Goal",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LESSON" => Some(GoalKind::Lesson),
            "QUESTION_SET" => Some(GoalKind::QuestionSet),
            "STATUTE_READING" => Some(GoalKind::StatuteReading),
            "SUMMARY" => Some(GoalKind::Summary),
            "REVIEW" => Some(GoalKind::Review),
            "MATERIAL" => Some(GoalKind::Material),
            "OTHER" => Some(GoalKind::Other),
            _ => None,
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProficiencyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "BEGINNER",
            ProficiencyLevel::Intermediate => "INTERMEDIATE",
            ProficiencyLevel::Advanced => "ADVANCED",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BEGINNER" => Some(ProficiencyLevel::Beginner),
            "INTERMEDIATE" => Some(ProficiencyLevel::Intermediate),
            "ADVANCED" => Some(ProficiencyLevel::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An individually timed piece of a lesson goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub title: String,
    pub duration_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Part {
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration_minutes: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_minutes,
            link: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub kind: GoalKind,
    pub title: String,
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Only meaningful for lesson goals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<i64>,
    #[serde(default)]
    pub revision_enabled: bool,
    /// Comma separated day offsets, e.g. `"1,7,15,30"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_intervals: Option<String>,
    #[serde(default)]
    pub repeat_last_interval: bool,
}

impl Goal {
    pub fn new(
        id: impl Into<String>,
        kind: GoalKind,
        title: impl Into<String>,
        order: i32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            order,
            color: None,
            observations: None,
            link: None,
            parts: Vec::new(),
            pages: None,
            multiplier: None,
            revision_enabled: false,
            revision_intervals: None,
            repeat_last_interval: false,
        }
    }

    pub fn lesson(
        id: impl Into<String>,
        title: impl Into<String>,
        order: i32,
        parts: Vec<Part>,
    ) -> Self {
        let mut goal = Self::new(id, GoalKind::Lesson, title, order);
        goal.parts = parts;
        goal
    }

    pub fn with_pages(mut self, pages: i64) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_multiplier(mut self, multiplier: i64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    pub fn with_revisions(mut self, intervals: impl Into<String>, repeat_last: bool) -> Self {
        self.revision_enabled = true;
        self.revision_intervals = Some(intervals.into());
        self.repeat_last_interval = repeat_last;
        self
    }

    pub fn is_lesson(&self) -> bool {
        self.kind == GoalKind::Lesson
    }

    pub fn find_part(&self, part_id: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.id == part_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub title: String,
    pub order: i32,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Subject {
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
            goals: Vec::new(),
        }
    }

    pub fn with_goal(mut self, goal: Goal) -> Self {
        self.goals.push(goal);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discipline {
    pub id: String,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl Discipline {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
            subjects: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }
}

/// A goal positioned in the curriculum, together with the labels of its ancestors.
#[derive(Debug, Clone, Copy)]
pub struct GoalContext<'a> {
    pub discipline: &'a Discipline,
    pub subject: &'a Subject,
    pub goal: &'a Goal,
}

/// The curriculum tree of a study plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub disciplines: Vec<Discipline>,
}

impl Plan {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            disciplines: Vec::new(),
        }
    }

    pub fn with_discipline(mut self, discipline: Discipline) -> Self {
        self.disciplines.push(discipline);
        self
    }

    /// Walks every goal in traversal order: `(discipline.order, subject.order, goal.order)`.
    /// The stored vectors are left untouched; ordering is applied on borrowed views.
    pub fn goals_in_order(&self) -> Vec<GoalContext<'_>> {
        let mut disciplines: Vec<&Discipline> = self.disciplines.iter().collect();
        disciplines.sort_by_key(|discipline| discipline.order);

        let mut ordered = Vec::new();
        for discipline in disciplines {
            let mut subjects: Vec<&Subject> = discipline.subjects.iter().collect();
            subjects.sort_by_key(|subject| subject.order);
            for subject in subjects {
                let mut goals: Vec<&Goal> = subject.goals.iter().collect();
                goals.sort_by_key(|goal| goal.order);
                for goal in goals {
                    ordered.push(GoalContext {
                        discipline,
                        subject,
                        goal,
                    });
                }
            }
        }
        ordered
    }

    pub fn find_goal(&self, goal_id: &str) -> Option<GoalContext<'_>> {
        self.disciplines.iter().find_map(|discipline| {
            discipline.subjects.iter().find_map(|subject| {
                subject
                    .goals
                    .iter()
                    .find(|goal| goal.id == goal_id)
                    .map(|goal| GoalContext {
                        discipline,
                        subject,
                        goal,
                    })
            })
        })
    }

    pub fn goal_count(&self) -> usize {
        self.disciplines
            .iter()
            .flat_map(|discipline| discipline.subjects.iter())
            .map(|subject| subject.goals.len())
            .sum()
    }
}
