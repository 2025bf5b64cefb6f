//! Plain-text output on stdout. Logs go to stderr.

#![allow(clippy::print_stdout)]

use mindful_ledger_core::dashboard::DashboardSummary;
use mindful_ledger_core::models::{
    AuthUser, Category, DailySnapshot, Habit, HabitLog, InvestmentProfile, SavingGoal,
    Transaction, UserProfile,
};

pub fn done(message: &str) {
    println!("{message}");
}

pub fn user(user: &AuthUser, profile: Option<&UserProfile>) {
    let name = profile
        .and_then(|p| p.person.as_ref())
        .map(|p| format!("{} {}", p.first_name, p.last_name));
    match name {
        Some(name) => println!("{name} <{}>", user.email),
        None => println!("{}", user.email),
    }
    println!("  role: {}  language: {}  timezone: {}", user.role, user.language, user.timezone);
}

pub fn profile(profile: &UserProfile) {
    println!("{}", profile.email);
    if let Some(person) = &profile.person {
        println!("  name:     {} {}", person.first_name, person.last_name);
        if let Some(phone) = &person.phone {
            println!("  phone:    {phone}");
        }
        if let Some(date) = person.birth_date {
            println!("  born:     {date}");
        }
        if let Some(country) = &person.country {
            println!("  country:  {country}");
        }
        if let Some(avatar) = &person.avatar_url {
            println!("  avatar:   {avatar}");
        }
    }
    println!("  language: {}", profile.language);
    println!("  timezone: {}", profile.timezone);
    println!("  member since {}", profile.created_at.format("%Y-%m-%d"));
}

pub fn dashboard(summary: &DashboardSummary, greeting: Option<&str>) {
    if let Some(name) = greeting {
        println!("Hello, {name}!");
    }
    println!("Income:   {}", summary.total_income);
    println!("Expense:  {}", summary.total_expense);
    println!("Balance:  {}", summary.balance);
    println!("Goals:    {}", summary.active_goals);

    if !summary.monthly.is_empty() {
        println!();
        println!("{:<8} {:>14} {:>14}", "Month", "Income", "Expense");
        for bucket in &summary.monthly {
            println!(
                "{:<8} {:>14} {:>14}",
                bucket.month,
                bucket.income.to_string(),
                bucket.expense.to_string()
            );
        }
    }

    if !summary.recent_transactions.is_empty() {
        println!();
        println!("Recent transactions");
        transactions(&summary.recent_transactions);
    }

    if !summary.goals.is_empty() {
        println!();
        println!("Saving goals");
        for progress in &summary.goals {
            println!("  {:<24} {:>3}%", progress.goal.name, progress.percent);
        }
    }

    if !summary.habits.is_empty() {
        println!();
        println!("Habits");
        for habit in &summary.habits {
            println!("  {} ({})", habit.name, habit.frequency);
        }
        if summary.more_habits > 0 {
            println!("  ... and {} more", summary.more_habits);
        }
    }

    println!();
    match &summary.today {
        Some(today) => snapshot(today),
        None => println!("No snapshot for today yet."),
    }
}

pub fn transactions(list: &[Transaction]) {
    if list.is_empty() {
        println!("No transactions.");
    }
    for tx in list {
        transaction(tx);
    }
}

pub fn transaction(tx: &Transaction) {
    let category = tx.category.as_ref().map_or("-", |c| c.name.as_str());
    let emotion = tx.emotion_tag.map_or("-", |e| e.as_str());
    println!(
        "{}  {}  {}{:>12}  {:<16} {:<9} {}",
        tx.id,
        tx.occurred_at.format("%Y-%m-%d %H:%M"),
        tx.kind.sign(),
        tx.amount.to_string(),
        category,
        emotion,
        tx.note.as_deref().unwrap_or("")
    );
}

pub fn goals(list: &[SavingGoal]) {
    if list.is_empty() {
        println!("No saving goals.");
    }
    for g in list {
        goal(g);
    }
}

pub fn goal(goal: &SavingGoal) {
    let due = goal
        .target_date
        .map(|d| format!(" by {d}"))
        .unwrap_or_default();
    println!(
        "{}  {:<24} {} / {} ({}%){due}",
        goal.id,
        goal.name,
        goal.current_amount,
        goal.target_amount,
        goal.progress_percent()
    );
}

pub fn habits<'a>(list: impl IntoIterator<Item = &'a Habit>) {
    let mut any = false;
    for h in list {
        habit(h);
        any = true;
    }
    if !any {
        println!("No habits.");
    }
}

pub fn habit(habit: &Habit) {
    let state = if habit.active { "active" } else { "archived" };
    println!("{}  {:<24} {:<7} {state}", habit.id, habit.name, habit.frequency);
}

pub fn habit_logs(logs: &[HabitLog]) {
    if logs.is_empty() {
        println!("Never logged.");
    }
    for log in logs {
        let mark = if log.completed { "x" } else { " " };
        println!("[{mark}] {}", log.date);
    }
}

pub fn snapshots(list: &[DailySnapshot]) {
    if list.is_empty() {
        println!("No snapshots.");
    }
    for s in list {
        snapshot(s);
    }
}

pub fn snapshot(snapshot: &DailySnapshot) {
    let mood = snapshot.mood.map_or("-", |m| m.label());
    let score = snapshot
        .conscious_score
        .map_or_else(|| "-".to_string(), |s| format!("{s}/10"));
    println!("{}  {mood}  score {score}", snapshot.date);
    if let Some(reflection) = &snapshot.reflection {
        println!("  {reflection}");
    }
}

pub fn categories(list: &[Category]) {
    for category in list {
        let system = if category.is_system { " (system)" } else { "" };
        println!(
            "{}  {} {:<20} {}{system}",
            category.id,
            category.icon.as_deref().unwrap_or(" "),
            category.name,
            category.kind
        );
    }
}

pub fn investments(list: &[InvestmentProfile]) {
    if list.is_empty() {
        println!("No investment profiles.");
    }
    for profile in list {
        investment(profile);
    }
}

pub fn investment(profile: &InvestmentProfile) {
    println!(
        "{}  {:<13} {}/month at {}%",
        profile.id,
        profile.strategy,
        profile.monthly_amount,
        profile.expected_return.normalize()
    );
}
