//! English cardinals, US style ("one hundred twenty-three").

pub(super) const CONNECTOR: &str = "point";

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] =
    ["", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety"];

const SCALES: [&str; 7] =
    ["", "thousand", "million", "billion", "trillion", "quadrillion", "quintillion"];

pub(super) fn cardinal(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut chunks = Vec::new();
    let mut rest = n;
    let mut scale = 0;
    while rest > 0 {
        let chunk = (rest % 1000) as usize;
        if chunk != 0 {
            let words = below_thousand(chunk);
            chunks.push(if scale == 0 { words } else { format!("{words} {}", SCALES[scale]) });
        }
        rest /= 1000;
        scale += 1;
    }

    chunks.reverse();
    chunks.join(" ")
}

/// Whole part, "point", then every fractional digit on its own.
pub(super) fn decimal(whole: u64, fraction: &str) -> String {
    let digits: Vec<&str> = fraction
        .bytes()
        .map(|b| ONES[usize::from(b - b'0')])
        .collect();
    format!("{} {CONNECTOR} {}", cardinal(whole), digits.join(" "))
}

fn below_thousand(n: usize) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    match (hundreds, rest) {
        (0, _) => below_hundred(rest),
        (h, 0) => format!("{} hundred", ONES[h]),
        (h, r) => format!("{} hundred {}", ONES[h], below_hundred(r)),
    }
}

fn below_hundred(n: usize) -> String {
    if n < 20 {
        return ONES[n].to_string();
    }
    match n % 10 {
        0 => TENS[n / 10].to_string(),
        unit => format!("{}-{}", TENS[n / 10], ONES[unit]),
    }
}
