use quiz_core::model::{AnswerRecord, BankEntry, QuestionBank, RecordId};
use quiz_core::pagination::Page;
use services::{QuizEvent, RecordListItem};

/// `mm:ss`, or `h:mm:ss` past the hour.
pub fn elapsed(seconds: u64) -> String {
    let (hours, rest) = (seconds / 3600, seconds % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

pub fn help() {
    println!("Commands:");
    println!("  start [n]               start a quiz, optionally limited to n questions");
    println!("  <number>                answer the shown question with that option");
    println!("  next                    skip the pause and show the next question");
    println!("  bank [page] [keyword]   browse the question bank");
    println!("  records [page]          list finished quizzes");
    println!("  detail <id> [page]      show the answers of one finished quiz");
    println!("  upload <path>           replace the question bank with a JSON file");
    println!("  home                    leave the current quiz");
    println!("  quit");
}

pub fn home(bank: &QuestionBank) {
    println!();
    println!("Quiz ({} questions in the bank). Type `help` for commands.", bank.len());
}

pub fn event(event: &QuizEvent) {
    match event {
        QuizEvent::Presented(question) => {
            println!();
            println!(
                "[{}/{}  score {}] {}",
                question.progress.answered + 1,
                question.progress.target,
                question.progress.score,
                question.text
            );
            for (number, option) in question.options.iter().enumerate() {
                println!("  {}. {option}", number + 1);
            }
        }
        QuizEvent::Answered { record, progress, .. } => {
            if record.is_correct() {
                println!("Correct!  ({}/{})", progress.score, progress.answered);
            } else {
                println!(
                    "Wrong: the answer is {}.  ({}/{})",
                    record.correct_answer_text(),
                    progress.score,
                    progress.answered
                );
            }
        }
        QuizEvent::Tick { elapsed_seconds } => {
            if elapsed_seconds % 30 == 0 {
                println!("  ... {}", elapsed(*elapsed_seconds));
            }
        }
        QuizEvent::Completed { record_id, summary } => {
            println!();
            println!(
                "Finished! Score {}/{} in {}. Saved as record {record_id}.",
                summary.score(),
                summary.total_questions(),
                elapsed(summary.elapsed_seconds())
            );
            println!("Type `detail {}` to review your answers.", record_id.value());
        }
    }
}

pub fn bank_page(page: &Page<BankEntry>, keyword: &str) {
    if page.items.is_empty() {
        if keyword.trim().is_empty() {
            println!("The question bank is empty.");
        } else {
            println!("No questions match `{keyword}`.");
        }
        return;
    }
    for entry in &page.items {
        let question = entry.question();
        println!("Q{}. {}", entry.id(), question.text());
        for (index, option) in question.options().iter().enumerate() {
            let marker = if question.is_correct(index) { '*' } else { ' ' };
            println!("  {marker} {}. {option}", index + 1);
        }
    }
    println!("(page {} of {})", page.page(), page.total_pages());
}

pub fn records_page(page: &Page<RecordListItem>) {
    if page.items.is_empty() {
        println!("No finished quizzes yet.");
        return;
    }
    for item in &page.items {
        let limit = item
            .question_limit
            .map_or_else(|| "all".to_owned(), |limit| limit.to_string());
        println!(
            "{:>4}  {:>3}/{:<3}  {}  limit {limit}",
            item.id.to_string(),
            item.score,
            item.total_questions,
            elapsed(item.elapsed_seconds)
        );
    }
    println!("(page {} of {})", page.page(), page.total_pages());
}

pub fn detail_page(id: RecordId, page: &Page<AnswerRecord>) {
    println!("Record {id}:");
    let first = page.window.offset();
    for (offset, answer) in page.items.iter().enumerate() {
        let verdict = if answer.is_correct() { "correct" } else { "wrong" };
        println!("{}. {}", first + offset + 1, answer.question_text());
        println!(
            "   you: {}  answer: {}  ({verdict})",
            answer.user_answer_text(),
            answer.correct_answer_text()
        );
    }
    println!("(page {} of {})", page.page(), page.total_pages());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_pads_minutes_and_seconds() {
        assert_eq!(elapsed(0), "00:00");
        assert_eq!(elapsed(75), "01:15");
        assert_eq!(elapsed(3_725), "1:02:05");
    }
}
