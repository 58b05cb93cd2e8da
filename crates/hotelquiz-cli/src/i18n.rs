//! Presentation strings for the two supported locales.

use hotelquiz_core::config::Locale;
use hotelquiz_core::model::Category;
use hotelquiz_core::pronunciation::PronunciationBand;
use hotelquiz_core::statistics::PerformanceBand;

pub struct Messages {
    pub question: &'static str,
    pub choice_prompt: &'static str,
    pub text_prompt: &'static str,
    pub invalid_choice: &'static str,
    pub seconds_left: &'static str,
    pub correct: &'static str,
    pub incorrect: &'static str,
    pub timed_out: &'static str,
    pub correct_answer: &'static str,
    pub explanation: &'static str,
    pub abandoned: &'static str,
    pub results: &'static str,
    pub score: &'static str,
    pub timeouts: &'static str,
    pub average_time: &'static str,
    pub category: &'static str,
    pub no_answer: &'static str,
    pub pronunciation_score: &'static str,
    pub heard: &'static str,
    pub similarity: &'static str,
    pub confidence: &'static str,
    pub alternatives: &'static str,
    pub progress_saved: &'static str,
}

const JA: Messages = Messages {
    question: "問題",
    choice_prompt: "記号 (A, B, ...) または番号で答えてください",
    text_prompt: "空欄に入る単語を入力してください",
    invalid_choice: "無効な入力です。もう一度入力してください。",
    seconds_left: "残り時間(秒)",
    correct: "正解！",
    incorrect: "不正解",
    timed_out: "時間切れ！",
    correct_answer: "正解",
    explanation: "解説",
    abandoned: "クイズを中断しました。",
    results: "クイズ結果",
    score: "スコア",
    timeouts: "時間切れ",
    average_time: "平均回答時間(秒)",
    category: "カテゴリー",
    no_answer: "(未回答)",
    pronunciation_score: "発音スコア",
    heard: "認識結果",
    similarity: "一致度",
    confidence: "信頼度",
    alternatives: "その他の候補",
    progress_saved: "学習記録を保存しました",
};

const EN: Messages = Messages {
    question: "Question",
    choice_prompt: "Enter a letter (A, B, ...) or a number",
    text_prompt: "Type the missing word",
    invalid_choice: "Invalid input, please try again.",
    seconds_left: "Seconds left",
    correct: "Correct!",
    incorrect: "Incorrect",
    timed_out: "Time's up!",
    correct_answer: "Correct answer",
    explanation: "Explanation",
    abandoned: "Quiz abandoned.",
    results: "Quiz results",
    score: "Score",
    timeouts: "Timeouts",
    average_time: "Average answer time (s)",
    category: "Category",
    no_answer: "(no answer)",
    pronunciation_score: "Pronunciation score",
    heard: "Heard",
    similarity: "Similarity",
    confidence: "Confidence",
    alternatives: "Alternatives",
    progress_saved: "Progress saved",
};

pub fn messages(locale: Locale) -> &'static Messages {
    match locale {
        Locale::Ja => &JA,
        Locale::En => &EN,
    }
}

pub fn category_label(locale: Locale, category: Category) -> &'static str {
    match (locale, category) {
        (Locale::Ja, Category::Checkin) => "チェックイン",
        (Locale::Ja, Category::Checkout) => "チェックアウト",
        (Locale::Ja, Category::RoomService) => "ルームサービス",
        (Locale::Ja, Category::Pronunciation) => "発音",
        (Locale::Ja, Category::Situation) => "状況対応",
        (Locale::En, Category::Checkin) => "Check-in",
        (Locale::En, Category::Checkout) => "Check-out",
        (Locale::En, Category::RoomService) => "Room service",
        (Locale::En, Category::Pronunciation) => "Pronunciation",
        (Locale::En, Category::Situation) => "Situations",
    }
}

pub fn performance_message(locale: Locale, band: PerformanceBand) -> &'static str {
    match (locale, band) {
        (Locale::Ja, PerformanceBand::Excellent) => "素晴らしい！ホテル英語をマスターしていますね！",
        (Locale::Ja, PerformanceBand::Good) => "よくできました！もう少しで完璧です。",
        (Locale::Ja, PerformanceBand::Fair) => "まずまずです。復習して再挑戦しましょう。",
        (Locale::Ja, PerformanceBand::NeedsReview) => "もう一度基本から復習しましょう。",
        (Locale::En, PerformanceBand::Excellent) => "Excellent! You have mastered hotel English!",
        (Locale::En, PerformanceBand::Good) => "Well done! Almost perfect.",
        (Locale::En, PerformanceBand::Fair) => "Not bad. Review and try again.",
        (Locale::En, PerformanceBand::NeedsReview) => "Let's review the basics once more.",
    }
}

pub fn pronunciation_message(locale: Locale, band: PronunciationBand) -> &'static str {
    match (locale, band) {
        (Locale::Ja, PronunciationBand::Great) => "素晴らしい発音です！",
        (Locale::Ja, PronunciationBand::Fair) => "良い発音です。もう少し練習しましょう。",
        (Locale::Ja, PronunciationBand::NeedsPractice) => "もう一度練習してみましょう。",
        (Locale::En, PronunciationBand::Great) => "Great pronunciation!",
        (Locale::En, PronunciationBand::Fair) => "Good. A little more practice.",
        (Locale::En, PronunciationBand::NeedsPractice) => "Let's practice that again.",
    }
}
