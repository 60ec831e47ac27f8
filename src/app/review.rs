use crate::app::api::NewReview;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewField {
    #[default]
    Reviewer,
    Text,
    Rating,
}

impl ReviewField {
    pub fn next(self) -> Self {
        match self {
            ReviewField::Reviewer => ReviewField::Text,
            ReviewField::Text => ReviewField::Rating,
            ReviewField::Rating => ReviewField::Reviewer,
        }
    }
}

/// The "add a review" form inside the detail overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewForm {
    pub reviewer: String,
    pub text: String,
    pub rating: i64,
    pub field: ReviewField,
    pub editing: bool,
    pub submitting: bool,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self {
            reviewer: String::new(),
            text: String::new(),
            rating: 5,
            field: ReviewField::default(),
            editing: false,
            submitting: false,
        }
    }
}

impl ReviewForm {
    pub fn type_char(&mut self, c: char) {
        match self.field {
            ReviewField::Reviewer => self.reviewer.push(c),
            ReviewField::Text => self.text.push(c),
            ReviewField::Rating => {
                if let Some(digit) = c.to_digit(10) {
                    self.set_rating(digit as i64);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            ReviewField::Reviewer => {
                self.reviewer.pop();
            }
            ReviewField::Text => {
                self.text.pop();
            }
            ReviewField::Rating => {}
        }
    }

    /// Ratings stay within 1..=5, like the select box they replace.
    pub fn set_rating(&mut self, rating: i64) {
        self.rating = rating.clamp(1, 5);
    }

    pub fn adjust_rating(&mut self, delta: i64) {
        self.set_rating(self.rating + delta);
    }

    /// Builds the request body when the required fields are filled in.
    pub fn to_request(&self) -> Option<NewReview> {
        let reviewer = self.reviewer.trim();
        let text = self.text.trim();
        if reviewer.is_empty() || text.is_empty() {
            return None;
        }

        Some(NewReview {
            reviewer: reviewer.to_string(),
            review_text: text.to_string(),
            rating: self.rating,
        })
    }

    pub fn reset(&mut self) {
        *self = ReviewForm::default();
    }
}
