/*!

This is the long-form manual for `church_health` and `healthy`.

## The questionnaire

Every respondent rates seven statements about their church community, from 1
(strongly disagree) to 10 (strongly agree):

| #  | Label           |
|----|-----------------|
| Q1 | HUMILITY        |
| Q2 | ENDURANCE       |
| Q3 | AUTHENTICITY    |
| Q4 | LOVE            |
| Q5 | TRUSTWORTHINESS |
| Q6 | HARMONY         |
| Q7 | YEARNING        |

The mean of each question is computed over all the respondents of a group, and
the overall score is the mean of these seven means. The overall score maps to
a category:

| Overall score | Category           |
|---------------|--------------------|
| 8.5 and above | Thriving Health    |
| 7.5 to 8.5    | Stable Health      |
| 6.5 to 7.5    | Moderate Concerns  |
| 5.5 to 6.5    | Significant Issues |
| below 5.5     | Critical Condition |

Lower bounds are inclusive: an overall score of exactly 7.5 is "Stable Health".

## The response sheet

Responses are stored in a sheet (a CSV file for `healthy`) with a header row.
Two layouts are supported, and the layout is a fixed setting of the sheet:

* `withControlId`: `Timestamp, Code, Control_ID, Q1, ..., Q7`
* `withoutControlId`: `Timestamp, Code, Q1, ..., Q7`

Column names are matched after trimming and lowercasing. Timestamps are
written as `2025-01-31 14:05:00` in the time zone of the survey. A timestamp
that cannot be read does not prevent the row from counting in the results of
its code, but the row never matches a date range.

## Submitting

A submission carries a church code, an optional control id and seven scores.

* The code is required.
* If a control id is given, it must not have been used already for the same
  code. The comparison is exact after trimming: `a1` and `A1` are different.
* After a successful submission, the same code accepts nothing else for two
  minutes in the same session.
* A failing write is retried twice, two seconds apart.

## Reports

Results may be requested:

* for one code,
* for one code between two dates (both days included),
* for the pairs listed in an allow-list file,
* for scores uploaded directly, without going through the sheet.

An allow-list file (CSV, XLS or XLSX) must have a `Code` (or `Church_Code`)
column and a `Control_ID` column. Other columns are ignored. The pairs are
compared to the sheet without regard to case or surrounding spaces. Rows with
an empty code or an empty control id are skipped.

A direct upload file must have exactly the seven columns `Q1` to `Q7`, in this
order, and every cell must be a score between 1 and 10.

## Configuration file

All the keys are optional.

```json
{
  "sheet": {
    "filePath": "responses.csv",
    "layout": "withControlId",
    "utcOffsetHours": 8
  },
  "rules": {
    "cooldownSeconds": 120,
    "appendAttempts": 3,
    "retryDelaySeconds": 2,
    "cacheSeconds": 15
  }
}
```

A relative `filePath` is resolved against the directory of the configuration
file. The `--sheet` option takes precedence over `filePath`.

## Command line

```text
healthy [--config FILE] [--sheet FILE] [--out PATH] [--reference PATH] [--verbose] <COMMAND>
```

* `questions`: prints the questionnaire.
* `submit --code CODE [--control-id ID] --scores 7,8,6,9,7,8,6`
* `results --code CODE [--from 2025-01-01 --to 2025-01-31]`
* `allow-list --input FILE [--worksheet NAME]`
* `upload --input FILE [--worksheet NAME]`
* `session`: reads the commands above from the standard input, one per line,
  until `quit`. Cooldowns and the read cache last for the whole session.
  Quotes group words, as in `results --code "First Baptist"`.

With `--out`, the summary is also written as JSON (`stdout` prints it). With
`--reference`, the JSON summary is compared with the given file and any
difference is an error.

*/
